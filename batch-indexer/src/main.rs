//! Batch indexer entry point.
//!
//! Loads settings from the environment, wires the pipeline, and drives a
//! single scheduled run to completion.

use std::process::ExitCode;

use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use batch_indexer::{Dependencies, IndexerError, Settings};
use batch_indexer_shared::{RunId, RunOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(outcome) => {
            if let RunOutcome::SucceededWithFailures(count) = outcome {
                warn!(failed = count, "Run finished with document failures");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunOutcome, IndexerError> {
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings)?;

    let run_id = match &settings.run_id {
        Some(id) => RunId::new(id.clone()),
        None => RunId::generate(),
    };

    let report = dependencies.scheduler.execute(&run_id).await?;

    info!(
        run = %report.run,
        rows_extracted = report.rows_extracted,
        rows_canonical = report.rows_canonical,
        documents_indexed = report.load.succeeded_count(),
        "Run complete"
    );

    Ok(report.outcome)
}

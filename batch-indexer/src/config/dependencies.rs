//! Dependency initialization and wiring for the batch indexer.

use std::sync::Arc;
use tracing::info;

use crate::{IndexerError, Settings};
use batch_indexer_pipeline::{PipelineConfig, PipelineRunner, RetryPolicy, Scheduler};
use batch_indexer_repository::{CsvArtifactStore, OpenSearchClient, PostgresTableSource};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured scheduler ready to run.
    pub scheduler: Scheduler,
}

impl Dependencies {
    /// Initialize all dependencies from the resolved settings.
    ///
    /// The database pool is created lazily, so a misconfigured source
    /// surfaces on the first extract attempt rather than here.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexerError)` - If initialization fails
    pub fn new(settings: &Settings) -> Result<Self, IndexerError> {
        info!(
            source_table = %settings.source_table,
            opensearch_url = %settings.opensearch_url,
            search_index = %settings.search_index,
            artifact_dir = %settings.artifact_dir.display(),
            "Initializing dependencies"
        );

        let source = PostgresTableSource::connect_lazy(&settings.database_url).map_err(|e| {
            IndexerError::config(format!("Failed to create Postgres source: {}", e))
        })?;

        let store = CsvArtifactStore::new(settings.artifact_dir.clone());

        let sink = OpenSearchClient::new(&settings.opensearch_url).map_err(|e| {
            IndexerError::config(format!("Failed to create OpenSearch client: {}", e))
        })?;

        let config = PipelineConfig {
            table: settings.source_table.clone(),
            index: settings.search_index.clone(),
            document_id_column: settings.document_id_column.clone(),
        };

        let runner = PipelineRunner::new(
            Arc::new(source),
            Arc::new(store),
            Arc::new(sink),
            config,
        );

        let policy = RetryPolicy::new(settings.max_retries, settings.retry_delay);
        let scheduler = Scheduler::new(runner, policy);

        Ok(Self { scheduler })
    }
}

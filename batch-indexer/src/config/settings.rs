//! Runtime settings resolved from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::IndexerError;

/// Default source table to snapshot.
const DEFAULT_SOURCE_TABLE: &str = "shopping_behavior";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default search index name.
const DEFAULT_SEARCH_INDEX: &str = "shopping";

/// Default directory for run artifacts.
const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";

/// Default number of retries per pipeline stage.
const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default delay between retry attempts, in milliseconds.
const DEFAULT_RETRY_DELAY_MS: u64 = 300_000;

/// Resolved runtime configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Connection string for the source database.
    pub database_url: String,
    /// Name of the source table to snapshot.
    pub source_table: String,
    /// OpenSearch server URL.
    pub opensearch_url: String,
    /// Target search index name.
    pub search_index: String,
    /// Root directory for per-run CSV artifacts.
    pub artifact_dir: PathBuf,
    /// Optional column whose values become document identifiers.
    pub document_id_column: Option<String>,
    /// Number of retries per pipeline stage.
    pub max_retries: u32,
    /// Delay between retry attempts.
    pub retry_delay: Duration,
    /// Optional externally supplied run identifier.
    pub run_id: Option<String>,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: source database connection string (required)
    /// - `SOURCE_TABLE`: source table name (default: shopping_behavior)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `SEARCH_INDEX`: target index name (default: shopping)
    /// - `ARTIFACT_DIR`: artifact root directory (default: ./artifacts)
    /// - `DOCUMENT_ID_COLUMN`: column providing document identifiers (optional)
    /// - `MAX_RETRIES`: retries per pipeline stage (default: 1)
    /// - `RETRY_DELAY_MS`: delay between retries in milliseconds (default: 300000)
    /// - `RUN_ID`: externally assigned run identifier (optional)
    pub fn from_env() -> Result<Self, IndexerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, IndexerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| IndexerError::config("DATABASE_URL must be set"))?;

        let source_table =
            lookup("SOURCE_TABLE").unwrap_or_else(|| DEFAULT_SOURCE_TABLE.to_string());
        let opensearch_url =
            lookup("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());
        let search_index =
            lookup("SEARCH_INDEX").unwrap_or_else(|| DEFAULT_SEARCH_INDEX.to_string());
        let artifact_dir = PathBuf::from(
            lookup("ARTIFACT_DIR").unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string()),
        );

        let document_id_column = lookup("DOCUMENT_ID_COLUMN").filter(|v| !v.trim().is_empty());

        let max_retries = match lookup("MAX_RETRIES") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                IndexerError::config(format!("MAX_RETRIES must be a non-negative integer: {}", raw))
            })?,
            None => DEFAULT_MAX_RETRIES,
        };

        let retry_delay_ms = match lookup("RETRY_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                IndexerError::config(format!(
                    "RETRY_DELAY_MS must be a non-negative integer: {}",
                    raw
                ))
            })?,
            None => DEFAULT_RETRY_DELAY_MS,
        };

        let run_id = lookup("RUN_ID").filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            source_table,
            opensearch_url,
            search_index,
            artifact_dir,
            document_id_column,
            max_retries,
            retry_delay: Duration::from_millis(retry_delay_ms),
            run_id,
        })
    }
}

//! Extractor stage.
//!
//! Performs a full, unfiltered read of the configured source table and
//! persists it verbatim as the run's staging artifact. No transformation
//! happens here; the staging artifact is the "latest raw snapshot" and
//! overwrites whatever a prior attempt of the same run left behind.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::PipelineError;
use batch_indexer_repository::{ArtifactStore, TableSource};
use batch_indexer_shared::{ArtifactKind, RunId};

/// Extractor that snapshots the source table into staging storage.
pub struct Extractor {
    source: Arc<dyn TableSource>,
    store: Arc<dyn ArtifactStore>,
    table_name: String,
}

impl Extractor {
    /// Create an extractor for the named source table.
    pub fn new(
        source: Arc<dyn TableSource>,
        store: Arc<dyn ArtifactStore>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            store,
            table_name: table_name.into(),
        }
    }

    /// Run the extract stage for one run. Returns the extracted row count.
    ///
    /// Safe to re-invoke: a retry re-reads the source and overwrites the
    /// staging artifact wholesale.
    #[instrument(skip(self), fields(run = %run, table = %self.table_name))]
    pub async fn extract(&self, run: &RunId) -> Result<usize, PipelineError> {
        let table = self
            .source
            .fetch_table(&self.table_name)
            .await
            .map_err(|e| PipelineError::source_unavailable(e.to_string()))?;

        self.store
            .write_table(run, ArtifactKind::Staging, &table)
            .await
            .map_err(|e| PipelineError::persist_failure(ArtifactKind::Staging, e.to_string()))?;

        info!(rows = table.row_count(), "Extract stage complete");
        Ok(table.row_count())
    }
}

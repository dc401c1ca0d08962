//! Loader stage.
//!
//! Reads the run's canonical artifact, maps every row to an indexed
//! document, and submits them to the sink in a single bulk call. The
//! sink upserts by document id, so re-running the loader against an
//! unchanged canonical artifact converges on the same sink state.
//!
//! Document identity: the value of the configured natural-key column
//! when one is set, otherwise the row's extraction sequence number. The
//! sequence is stable within a run but not across runs if the source
//! does not guarantee row order; the loader logs that caveat once per
//! run when the fallback is in effect.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::errors::PipelineError;
use crate::transformer::normalize_column_name;
use batch_indexer_repository::{ArtifactStore, SearchSink, StoreError};
use batch_indexer_shared::{ArtifactKind, IndexedDocument, LoadReport, RunId, Table};

/// Loader that bulk-upserts canonical rows into the search index.
pub struct Loader {
    store: Arc<dyn ArtifactStore>,
    sink: Arc<dyn SearchSink>,
    index: String,
    document_id_column: Option<String>,
}

impl Loader {
    /// Create a loader for the named target index.
    ///
    /// `document_id_column` selects a natural-key column for document
    /// identity; it is matched after normalization, so either the source
    /// spelling or the canonical one is accepted.
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        sink: Arc<dyn SearchSink>,
        index: impl Into<String>,
        document_id_column: Option<String>,
    ) -> Self {
        Self {
            store,
            sink,
            index: index.into(),
            document_id_column: document_id_column.map(|c| normalize_column_name(&c)),
        }
    }

    /// Run the load stage for one run.
    ///
    /// A transport-level sink failure propagates as `SinkUnavailable`
    /// with no report; the canonical artifact stays in place for a
    /// retry. Per-document failures come back inside the `LoadReport`
    /// and do not fail the stage.
    #[instrument(skip(self), fields(run = %run, index = %self.index))]
    pub async fn load(&self, run: &RunId) -> Result<LoadReport, PipelineError> {
        let canonical = self
            .store
            .read_table(run, ArtifactKind::Canonical)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => {
                    PipelineError::CanonicalNotFound(format!("run {}", run))
                }
                other => PipelineError::CanonicalNotFound(other.to_string()),
            })?;

        let documents = self.build_documents(&canonical)?;

        let report = self
            .sink
            .bulk_upsert(&self.index, &documents)
            .await
            .map_err(|e| PipelineError::sink_unavailable(e.to_string()))?;

        if report.is_complete() {
            info!(documents = report.total, "Load stage complete");
        } else {
            let failed_ids: Vec<&str> = report.failures.iter().map(|f| f.id.as_str()).collect();
            warn!(
                documents = report.total,
                failed = report.failed_count(),
                failed_ids = ?failed_ids,
                "Load stage complete with document failures"
            );
        }

        Ok(report)
    }

    fn build_documents(&self, table: &Table) -> Result<Vec<IndexedDocument>, PipelineError> {
        let id_index = match self.document_id_column.as_deref() {
            Some(column) => Some(
                table
                    .column_index(column)
                    .ok_or_else(|| PipelineError::UnknownIdColumn(column.to_string()))?,
            ),
            None => {
                if !table.is_empty() {
                    warn!(
                        "No document id column configured; using row sequence as document \
                         identity, which is not stable across runs"
                    );
                }
                None
            }
        };

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut documents = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let id = match id_index {
                // Canonical rows have no missing cells; the fallback
                // covers a malformed artifact rather than panicking.
                Some(index) => row.cells[index]
                    .clone()
                    .unwrap_or_else(|| row.seq.to_string()),
                None => row.seq.to_string(),
            };

            // Cleaning dedups full rows, not keys: distinct rows sharing
            // a natural-key value collapse into one sink document.
            if id_index.is_some() && !seen_ids.insert(id.clone()) {
                warn!(
                    key = %id,
                    row_seq = row.seq,
                    "Duplicate document id; the later row overwrites the earlier document"
                );
            }

            let mut body = Map::with_capacity(table.columns.len());
            for (column, cell) in table.columns.iter().zip(&row.cells) {
                body.insert(column.clone(), scalar_value(cell));
            }

            documents.push(IndexedDocument::new(id, Value::Object(body)));
        }

        Ok(documents)
    }
}

/// Render one cell as a JSON scalar: integer, then float, then boolean,
/// falling back to the raw string. Artifacts carry values as strings;
/// this is the only point where a typed form is derived, and it does not
/// feed back into any artifact.
fn scalar_value(cell: &Option<String>) -> Value {
    let Some(text) = cell else {
        return Value::Null;
    };

    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = text.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    if let Ok(flag) = text.parse::<bool>() {
        return Value::from(flag);
    }

    Value::from(text.as_str())
}

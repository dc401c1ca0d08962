//! Transformer stage.
//!
//! Reads the run's staging artifact from storage (never in-process from
//! the extractor, so a transform retry does not force a re-extract),
//! cleans it, and persists the canonical artifact. Cleaning order is
//! fixed: missing-value rows first, then exact duplicates, then column
//! name normalization. Cell values are never altered.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use batch_indexer_repository::{ArtifactStore, StoreError};
use batch_indexer_shared::{ArtifactKind, RunId, Table};

/// Transformer that derives the canonical artifact from staging.
pub struct Transformer {
    store: Arc<dyn ArtifactStore>,
}

impl Transformer {
    /// Create a transformer over the given artifact store.
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Run the transform stage for one run. Returns the canonical row count.
    ///
    /// Deterministic in its persisted input, so safe to re-invoke. A
    /// missing or unreadable staging artifact fails before anything is
    /// written, leaving no partial canonical artifact behind.
    #[instrument(skip(self), fields(run = %run))]
    pub async fn transform(&self, run: &RunId) -> Result<usize, PipelineError> {
        let staging = self
            .store
            .read_table(run, ArtifactKind::Staging)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => {
                    PipelineError::StagingNotFound(format!("run {}", run))
                }
                other => PipelineError::StagingNotFound(other.to_string()),
            })?;

        let staged_rows = staging.row_count();
        let canonical = clean(staging)?;

        self.store
            .write_table(run, ArtifactKind::Canonical, &canonical)
            .await
            .map_err(|e| PipelineError::persist_failure(ArtifactKind::Canonical, e.to_string()))?;

        info!(
            staged_rows,
            canonical_rows = canonical.row_count(),
            dropped = staged_rows - canonical.row_count(),
            "Transform stage complete"
        );
        Ok(canonical.row_count())
    }
}

/// Clean a staging table into canonical form.
///
/// 1. Drop every row with at least one missing cell.
/// 2. Drop exact duplicate rows (field-wise over cells; the row-sequence
///    identity is not a field), keeping the first occurrence.
/// 3. Normalize column names, rejecting normalization collisions.
pub fn clean(table: Table) -> Result<Table, PipelineError> {
    let columns = normalize_columns(&table.columns)?;

    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_missing = 0usize;
    let mut dropped_duplicate = 0usize;

    for row in table.rows {
        if row.has_missing() {
            dropped_missing += 1;
            continue;
        }
        if !seen.insert(row.cells.clone()) {
            dropped_duplicate += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(dropped_missing, dropped_duplicate, "Cleaned staging rows");
    Ok(Table { columns, rows })
}

/// Normalize all column names, failing if two distinct originals collide.
fn normalize_columns(columns: &[String]) -> Result<Vec<String>, PipelineError> {
    let mut by_normalized: HashMap<String, &str> = HashMap::new();
    let mut normalized = Vec::with_capacity(columns.len());

    for column in columns {
        let name = normalize_column_name(column);
        if let Some(prior) = by_normalized.insert(name.clone(), column.as_str()) {
            return Err(PipelineError::ColumnNameCollision {
                first: prior.to_string(),
                second: column.clone(),
                normalized: name,
            });
        }
        normalized.push(name);
    }

    Ok(normalized)
}

/// Normalize one column name: trim, lowercase, whitespace to underscore,
/// then strip everything outside `[a-z0-9_]`.
///
/// Idempotent: applying it to an already-normalized name is a no-op.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rows_table, MemoryArtifactStore};

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Customer ID "), "customer_id");
        assert_eq!(normalize_column_name("  Payment-Method"), "paymentmethod");
        assert_eq!(normalize_column_name("Review Rating"), "review_rating");
        assert_eq!(normalize_column_name("Age"), "age");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["Customer ID ", "Item Purchased", "frequency_of_purchases"] {
            let once = normalize_column_name(name);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn test_clean_drops_missing_then_duplicates() {
        let table = rows_table(
            &["A", "B"],
            &[
                &[Some("1"), Some("x")],
                &[Some("1"), None],      // missing, dropped
                &[Some("1"), Some("x")], // duplicate of row 0, dropped
                &[Some("2"), Some("y")],
            ],
        );

        let cleaned = clean(table).unwrap();
        assert_eq!(cleaned.row_count(), 2);
        // First occurrence survives, identified by its original sequence.
        assert_eq!(cleaned.rows[0].seq, 0);
        assert_eq!(cleaned.rows[1].seq, 3);
    }

    #[test]
    fn test_clean_is_idempotent_on_its_own_output() {
        let table = rows_table(
            &["Customer ID ", "Age"],
            &[
                &[Some("c-1"), Some("34")],
                &[Some("c-1"), Some("34")],
                &[Some("c-2"), None],
                &[Some("c-3"), Some("51")],
            ],
        );

        let once = clean(table).unwrap();
        let twice = clean(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rows_with_missing_values_do_not_shadow_duplicates() {
        // A missing-value row is removed before dedup, so it cannot
        // count as the "first occurrence" of anything.
        let table = rows_table(
            &["A"],
            &[&[None], &[Some("x")], &[Some("x")]],
        );

        let cleaned = clean(table).unwrap();
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.rows[0].seq, 1);
    }

    #[test]
    fn test_column_collision_is_rejected() {
        let table = rows_table(&["Customer ID", "customer_id"], &[]);

        let err = clean(table).unwrap_err();
        match err {
            PipelineError::ColumnNameCollision {
                first,
                second,
                normalized,
            } => {
                assert_eq!(first, "Customer ID");
                assert_eq!(second, "customer_id");
                assert_eq!(normalized, "customer_id");
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn test_values_are_not_coerced() {
        let table = rows_table(&["Amount (USD)"], &[&[Some(" 12.50 ")]]);
        let cleaned = clean(table).unwrap();

        // Column names normalize; cell values stay byte-for-byte.
        assert_eq!(cleaned.columns, vec!["amount_usd"]);
        assert_eq!(cleaned.rows[0].cells[0], Some(" 12.50 ".to_string()));
    }

    #[tokio::test]
    async fn test_transform_reads_and_writes_the_store() {
        let store = Arc::new(MemoryArtifactStore::new());
        let run = RunId::new("run-1");
        store.put(
            &run,
            ArtifactKind::Staging,
            rows_table(
                &["Customer ID "],
                &[&[Some("c-1")], &[Some("c-1")], &[None]],
            ),
        );

        let transformer = Transformer::new(store.clone());
        let count = transformer.transform(&run).await.unwrap();

        assert_eq!(count, 1);
        let canonical = store.get(&run, ArtifactKind::Canonical).unwrap();
        assert_eq!(canonical.columns, vec!["customer_id"]);
    }

    #[tokio::test]
    async fn test_missing_staging_fails_without_partial_write() {
        let store = Arc::new(MemoryArtifactStore::new());
        let run = RunId::new("run-1");

        let transformer = Transformer::new(store.clone());
        let err = transformer.transform(&run).await.unwrap_err();

        assert!(matches!(err, PipelineError::StagingNotFound(_)));
        assert!(store.get(&run, ArtifactKind::Canonical).is_none());
    }
}

//! Filesystem-backed artifact store using CSV serialization.
//!
//! Artifacts live at `<root>/<run_id>/<stage>.csv` with a header row of
//! `row_seq` followed by the column names. Missing cells are serialized
//! as the empty field, which means an empty string and a missing value
//! are indistinguishable after a round-trip; the upstream system this
//! pipeline replaces had the same equivalence through its CSV staging.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::interfaces::ArtifactStore;
use batch_indexer_shared::{ArtifactKind, RunId, Table, TableRow};

/// Column header for the row-sequence identity.
const ROW_SEQ_HEADER: &str = "row_seq";

/// Artifact store rooted at a local directory.
pub struct CsvArtifactStore {
    root: PathBuf,
}

impl CsvArtifactStore {
    /// Create a store rooted at `root`. The directory is created lazily
    /// on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the artifact for the given run and stage.
    fn artifact_path(&self, run: &RunId, kind: ArtifactKind) -> PathBuf {
        self.root
            .join(run.as_str())
            .join(format!("{}.csv", kind.as_str()))
    }

    fn write_csv(path: &Path, table: &Table) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| StoreError::write(format!("{}: {}", path.display(), e)))?;

        let mut header = Vec::with_capacity(table.columns.len() + 1);
        header.push(ROW_SEQ_HEADER.to_string());
        header.extend(table.columns.iter().cloned());
        writer
            .write_record(&header)
            .map_err(|e| StoreError::write(e.to_string()))?;

        for row in &table.rows {
            let mut record = Vec::with_capacity(row.cells.len() + 1);
            record.push(row.seq.to_string());
            for cell in &row.cells {
                record.push(cell.clone().unwrap_or_default());
            }
            writer
                .write_record(&record)
                .map_err(|e| StoreError::write(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| StoreError::write(e.to_string()))?;
        Ok(())
    }

    fn read_csv(path: &Path) -> Result<Table, StoreError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| StoreError::read(format!("{}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| StoreError::malformed(e.to_string()))?
            .clone();

        let mut header_iter = headers.iter();
        match header_iter.next() {
            Some(ROW_SEQ_HEADER) => {}
            other => {
                return Err(StoreError::malformed(format!(
                    "expected leading {} column, found {:?}",
                    ROW_SEQ_HEADER, other
                )));
            }
        }
        let columns: Vec<String> = header_iter.map(str::to_string).collect();

        let mut table = Table::new(columns);
        for result in reader.records() {
            let record = result.map_err(|e| StoreError::malformed(e.to_string()))?;
            let mut fields = record.iter();
            let seq = fields
                .next()
                .ok_or_else(|| StoreError::malformed("empty record"))?
                .parse::<u64>()
                .map_err(|e| StoreError::malformed(format!("bad row_seq: {}", e)))?;
            let cells = fields
                .map(|f| {
                    if f.is_empty() {
                        None
                    } else {
                        Some(f.to_string())
                    }
                })
                .collect();
            table.rows.push(TableRow::new(seq, cells));
        }

        Ok(table)
    }
}

#[async_trait]
impl ArtifactStore for CsvArtifactStore {
    /// Persist a table, replacing any prior artifact at the same address.
    ///
    /// The table is written to a temporary sibling and renamed into
    /// place, so a mid-write failure never leaves a partial artifact.
    async fn write_table(
        &self,
        run: &RunId,
        kind: ArtifactKind,
        table: &Table,
    ) -> Result<(), StoreError> {
        let path = self.artifact_path(run, kind);
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::write("artifact path has no parent"))?;
        fs::create_dir_all(dir).map_err(|e| StoreError::write(e.to_string()))?;

        let tmp = path.with_extension("csv.tmp");
        Self::write_csv(&tmp, table)?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::write(e.to_string()))?;

        info!(
            run = %run,
            stage = %kind,
            rows = table.row_count(),
            path = %path.display(),
            "Persisted artifact"
        );
        Ok(())
    }

    async fn read_table(&self, run: &RunId, kind: ArtifactKind) -> Result<Table, StoreError> {
        let path = self.artifact_path(run, kind);
        if !path.exists() {
            return Err(StoreError::not_found(run, kind));
        }

        let table = Self::read_csv(&path)?;
        debug!(
            run = %run,
            stage = %kind,
            rows = table.row_count(),
            "Read artifact"
        );
        Ok(table)
    }
}

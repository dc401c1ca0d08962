//! In-memory collaborator fakes shared by the pipeline tests.
//!
//! Each fake mirrors the contract of its trait: the store is keyed by
//! `(run, kind)` with overwrite-on-write, the sink upserts by document
//! id, and both can be told to fail on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use batch_indexer_repository::{
    ArtifactStore, SearchSink, SinkError, SourceError, StoreError, TableSource,
};
use batch_indexer_shared::{
    ArtifactKind, DocumentFailure, IndexedDocument, LoadReport, RunId, Table, TableRow,
};

/// Build a table literal: columns plus rows of optional cells.
pub(crate) fn rows_table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
    let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
    for (seq, cells) in rows.iter().enumerate() {
        table.rows.push(TableRow::new(
            seq as u64,
            cells.iter().map(|c| c.map(String::from)).collect(),
        ));
    }
    table
}

pub(crate) mod fixtures {
    use super::*;

    /// The canonical end-to-end fixture: 10 source rows containing two
    /// exact duplicates (of rows 2 and 1) and one row with a null field,
    /// leaving 7 clean records.
    pub(crate) fn shopping_table() -> Table {
        rows_table(
            &["Customer ID ", "Age", "Purchase Amount (USD)"],
            &[
                &[Some("c-01"), Some("34"), Some("53.3")],
                &[Some("c-02"), Some("25"), Some("12.5")],
                &[Some("c-03"), Some("41"), Some("99.9")],
                &[Some("c-03"), Some("41"), Some("99.9")], // duplicate
                &[Some("c-04"), None, Some("20.5")],       // null field
                &[Some("c-05"), Some("19"), Some("7.25")],
                &[Some("c-06"), Some("62"), Some("88.1")],
                &[Some("c-02"), Some("25"), Some("12.5")], // duplicate
                &[Some("c-07"), Some("30"), Some("45.0")],
                &[Some("c-08"), Some("55"), Some("63.1")],
            ],
        )
    }

    /// `count` unique, complete rows; canonical output keeps them all,
    /// with document ids `0..count`.
    pub(crate) fn unique_rows(count: usize) -> Table {
        let mut table = Table::new(vec!["customer_id".to_string(), "age".to_string()]);
        for i in 0..count {
            table.rows.push(TableRow::new(
                i as u64,
                vec![Some(format!("c-{i:02}")), Some((20 + i).to_string())],
            ));
        }
        table
    }
}

/// Table source fake with scriptable transient failures.
pub(crate) struct MemoryTableSource {
    table: Table,
    failures: AtomicUsize,
    fetches: AtomicUsize,
}

impl MemoryTableSource {
    pub(crate) fn new(table: Table) -> Self {
        Self {
            table,
            failures: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fail the next `count` fetches before succeeding again.
    pub(crate) fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableSource for MemoryTableSource {
    async fn fetch_table(&self, _table_name: &str) -> Result<Table, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(SourceError::connection("simulated connection failure"));
        }
        Ok(self.table.clone())
    }
}

/// Artifact store fake keyed by `(run, kind)`.
pub(crate) struct MemoryArtifactStore {
    tables: Mutex<HashMap<(RunId, ArtifactKind), Table>>,
    fail_writes: AtomicBool,
}

impl MemoryArtifactStore {
    pub(crate) fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn put(&self, run: &RunId, kind: ArtifactKind, table: Table) {
        self.tables
            .lock()
            .unwrap()
            .insert((run.clone(), kind), table);
    }

    pub(crate) fn get(&self, run: &RunId, kind: ArtifactKind) -> Option<Table> {
        self.tables.lock().unwrap().get(&(run.clone(), kind)).cloned()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn write_table(
        &self,
        run: &RunId,
        kind: ArtifactKind,
        table: &Table,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::write("simulated write failure"));
        }
        self.put(run, kind, table.clone());
        Ok(())
    }

    async fn read_table(&self, run: &RunId, kind: ArtifactKind) -> Result<Table, StoreError> {
        self.get(run, kind)
            .ok_or_else(|| StoreError::not_found(run, kind))
    }
}

/// Search sink fake that records committed documents by id.
pub(crate) struct RecordingSink {
    documents: Mutex<HashMap<String, Value>>,
    fail_ids: Mutex<Vec<String>>,
    unavailable: AtomicBool,
    bulk_calls: AtomicUsize,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            fail_ids: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
            bulk_calls: AtomicUsize::new(0),
        }
    }

    /// Reject this document id server-side on every bulk call.
    pub(crate) fn fail_document(&self, id: &str) {
        self.fail_ids.lock().unwrap().push(id.to_string());
    }

    /// Make the sink unreachable at the transport level.
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn document(&self, id: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub(crate) fn all_documents(&self) -> HashMap<String, Value> {
        self.documents.lock().unwrap().clone()
    }

    pub(crate) fn bulk_call_count(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchSink for RecordingSink {
    async fn bulk_upsert(
        &self,
        _index: &str,
        documents: &[IndexedDocument],
    ) -> Result<LoadReport, SinkError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SinkError::unavailable("simulated: connection refused"));
        }
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        let fail_ids = self.fail_ids.lock().unwrap().clone();
        let mut committed = self.documents.lock().unwrap();

        let mut report = LoadReport {
            total: documents.len(),
            ..LoadReport::default()
        };
        for doc in documents {
            if fail_ids.contains(&doc.id) {
                report.failures.push(DocumentFailure {
                    id: doc.id.clone(),
                    reason: "simulated server-side rejection".to_string(),
                });
            } else {
                committed.insert(doc.id.clone(), doc.body.clone());
                report.succeeded.push(doc.id.clone());
            }
        }

        Ok(report)
    }
}

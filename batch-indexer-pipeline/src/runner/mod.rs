//! Run coordination.
//!
//! `PipelineRunner` owns the three stages and exposes them as
//! individually re-invokable entry points; the run-level state machine
//! and retry policy live in the scheduler, which drives these entry
//! points in strict sequence.

mod state;

pub use state::{RunState, Stage};

use std::sync::Arc;

use crate::errors::PipelineError;
use crate::extractor::Extractor;
use crate::loader::Loader;
use crate::transformer::Transformer;
use batch_indexer_repository::{ArtifactStore, SearchSink, TableSource};
use batch_indexer_shared::{LoadReport, RunId, RunOutcome};

/// Per-run configuration, passed in explicitly at construction time.
/// There is no ambient connection state anywhere in the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source table to snapshot.
    pub table: String,
    /// Target search index.
    pub index: String,
    /// Optional natural-key column for document identity. When unset,
    /// the extraction row sequence is used (stable within a run only).
    pub document_id_column: Option<String>,
}

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The run this report describes.
    pub run: RunId,
    /// Rows read from the source table.
    pub rows_extracted: usize,
    /// Rows surviving cleaning.
    pub rows_canonical: usize,
    /// Per-document outcome of the bulk load.
    pub load: LoadReport,
    /// Final outcome ("succeeded" or "succeeded with N document failures").
    pub outcome: RunOutcome,
}

/// Runner that wires the stages to their collaborators.
///
/// Each entry point is a pure function of its persisted input artifact
/// plus overwrite-on-write semantics, so a supervisor may re-invoke any
/// stage after a failure without re-running upstream stages.
pub struct PipelineRunner {
    extractor: Extractor,
    transformer: Transformer,
    loader: Loader,
}

impl PipelineRunner {
    /// Create a runner from its collaborators and configuration.
    pub fn new(
        source: Arc<dyn TableSource>,
        store: Arc<dyn ArtifactStore>,
        sink: Arc<dyn SearchSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor: Extractor::new(source, store.clone(), config.table),
            transformer: Transformer::new(store.clone()),
            loader: Loader::new(store, sink, config.index, config.document_id_column),
        }
    }

    /// Extract stage entry point. Returns the staged row count.
    pub async fn extract(&self, run: &RunId) -> Result<usize, PipelineError> {
        self.extractor.extract(run).await
    }

    /// Transform stage entry point. Returns the canonical row count.
    pub async fn transform(&self, run: &RunId) -> Result<usize, PipelineError> {
        self.transformer.transform(run).await
    }

    /// Load stage entry point. Returns the per-document report.
    pub async fn load(&self, run: &RunId) -> Result<LoadReport, PipelineError> {
        self.loader.load(run).await
    }
}

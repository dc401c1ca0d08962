//! Indexed documents and load reporting.
//!
//! The loader maps each canonical row to an `IndexedDocument` and submits
//! them in one bulk call. The sink's bulk protocol can report per-document
//! failures inside an overall-successful call, so the result is always a
//! `LoadReport` enumerating both outcomes, never an all-or-nothing flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sink-addressable document with an explicit identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Document identity in the sink. Overwritten on re-submission
    /// (upsert), which is what makes loader re-runs idempotent.
    pub id: String,
    /// Document body as a JSON object keyed by canonical column names.
    pub body: Value,
}

impl IndexedDocument {
    /// Create a document from its identity and body.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// A single document the sink rejected inside a bulk call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Identity of the rejected document.
    pub id: String,
    /// Sink-reported reason.
    pub reason: String,
}

/// Per-document outcome of one bulk load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Total documents submitted.
    pub total: usize,
    /// Identities the sink accepted.
    pub succeeded: Vec<String>,
    /// Documents the sink rejected, with reasons.
    pub failures: Vec<DocumentFailure>,
}

impl LoadReport {
    /// A report for an empty submission.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every document was accepted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of accepted documents.
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of rejected documents.
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// Final outcome of a run that reached the end of the load stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every document was accepted by the sink.
    Succeeded,
    /// The run completed but the sink rejected this many documents.
    /// Recoverable by re-running the loader (upserts by identity).
    SucceededWithFailures(usize),
}

impl RunOutcome {
    /// Derive the outcome from a load report.
    pub fn from_report(report: &LoadReport) -> Self {
        if report.is_complete() {
            RunOutcome::Succeeded
        } else {
            RunOutcome::SucceededWithFailures(report.failed_count())
        }
    }
}

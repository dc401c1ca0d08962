//! # Batch Indexer Shared
//!
//! This crate provides the shared types and data structures used across
//! the batch indexer system: run identities, the in-memory tabular
//! artifact, and the document/report types produced by the load stage.

pub mod document;
pub mod run;
pub mod table;

pub use document::{DocumentFailure, IndexedDocument, LoadReport, RunOutcome};
pub use run::{ArtifactKind, RunId};
pub use table::{Table, TableRow};

//! # Batch Indexer Pipeline
//!
//! This crate provides the three-stage batch pipeline that snapshots a
//! relational table into a search index.
//!
//! ## Architecture
//!
//! The pipeline follows the Extractor-Transformer-Loader pattern:
//!
//! 1. **Extractor**: Reads the full source table into the staging artifact
//! 2. **Transformer**: Cleans and normalizes staging into the canonical artifact
//! 3. **Loader**: Bulk-upserts canonical rows into the search index
//! 4. **Scheduler**: Drives the steps in sequence with per-step retry
//!
//! Stages communicate only through persisted artifacts, so each stage is
//! a pure function of its stored input and safe to re-invoke.

pub mod errors;
pub mod extractor;
pub mod loader;
pub mod runner;
pub mod scheduler;
pub mod transformer;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::PipelineError;
pub use runner::{PipelineConfig, PipelineRunner, RunReport, RunState, Stage};
pub use scheduler::{RetryPolicy, Scheduler};

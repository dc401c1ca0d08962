//! # Batch Indexer
//!
//! Main library for the batch indexer binary.
//!
//! This crate provides the entry point and configuration for running the
//! table-snapshot pipeline: environment settings, dependency wiring, and
//! the top-level error type.

pub mod config;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] batch_indexer_pipeline::PipelineError),
}

impl IndexerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

//! Error types for the pipeline's external collaborators.

use thiserror::Error;

use batch_indexer_shared::{ArtifactKind, RunId};

/// Errors that can occur while reading from the relational source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Failed to reach or authenticate against the source.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The query itself failed (missing table, permission, cancelled).
    #[error("Query error: {0}")]
    QueryError(String),

    /// A column uses a type the source adapter cannot decode.
    #[error("Unsupported type {type_name} in column {column}")]
    UnsupportedType { column: String, type_name: String },

    /// The requested table name is not a valid identifier.
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}

impl SourceError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }
}

/// Errors that can occur in the staging/canonical artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact exists at the given run/stage address.
    #[error("Artifact not found: run {run}, stage {kind}")]
    NotFound { run: RunId, kind: ArtifactKind },

    /// Failed to write an artifact.
    #[error("Write error: {0}")]
    WriteError(String),

    /// Failed to read an artifact that exists.
    #[error("Read error: {0}")]
    ReadError(String),

    /// An artifact exists but is not a valid tabular serialization.
    #[error("Malformed artifact: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Create a not-found error for the given address.
    pub fn not_found(run: &RunId, kind: ArtifactKind) -> Self {
        Self::NotFound {
            run: run.clone(),
            kind,
        }
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a malformed-artifact error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Errors that can occur while writing to the search sink.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink could not be reached at the transport level.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    /// The bulk call itself was rejected (non-2xx envelope).
    #[error("Bulk request error: {0}")]
    BulkError(String),

    /// The sink returned a response the client could not interpret.
    #[error("Invalid sink response: {0}")]
    InvalidResponse(String),
}

impl SinkError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a bulk request error.
    pub fn bulk(msg: impl Into<String>) -> Self {
        Self::BulkError(msg.into())
    }

    /// Create an invalid-response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

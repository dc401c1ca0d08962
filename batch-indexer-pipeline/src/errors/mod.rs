//! Error types for the batch indexer pipeline.
//!
//! Every stage-local error is fatal to that stage invocation and
//! propagates to the scheduler unhandled; retry policy lives entirely at
//! the scheduler boundary. Per-document load failures are NOT errors:
//! they travel in the `LoadReport`.

use thiserror::Error;

use batch_indexer_shared::ArtifactKind;

/// Errors that can occur in the batch indexer pipeline.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The relational source could not be reached or read.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A stage produced its artifact but could not persist it.
    #[error("Failed to persist {stage} artifact: {message}")]
    StagePersistFailure {
        stage: ArtifactKind,
        message: String,
    },

    /// The staging artifact is missing or unreadable.
    #[error("Staging artifact not found: {0}")]
    StagingNotFound(String),

    /// Two distinct source columns normalize to the same name. Silently
    /// dropping one would lose a column, so this aborts the transform.
    #[error("Columns {first:?} and {second:?} both normalize to {normalized:?}")]
    ColumnNameCollision {
        first: String,
        second: String,
        normalized: String,
    },

    /// The canonical artifact is missing or unreadable.
    #[error("Canonical artifact not found: {0}")]
    CanonicalNotFound(String),

    /// The search sink rejected or never received the bulk call.
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The configured document id column is not a canonical column.
    #[error("Document id column {0:?} not present in canonical artifact")]
    UnknownIdColumn(String),
}

impl PipelineError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Create a persist-failure error for the given stage artifact.
    pub fn persist_failure(stage: ArtifactKind, msg: impl Into<String>) -> Self {
        Self::StagePersistFailure {
            stage,
            message: msg.into(),
        }
    }

    /// Create a sink-unavailable error.
    pub fn sink_unavailable(msg: impl Into<String>) -> Self {
        Self::SinkUnavailable(msg.into())
    }

    /// Short kind name for run reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "SourceUnavailable",
            Self::StagePersistFailure { .. } => "StagePersistFailure",
            Self::StagingNotFound(_) => "StagingNotFound",
            Self::ColumnNameCollision { .. } => "ColumnNameCollision",
            Self::CanonicalNotFound(_) => "CanonicalNotFound",
            Self::SinkUnavailable(_) => "SinkUnavailable",
            Self::UnknownIdColumn(_) => "UnknownIdColumn",
        }
    }
}

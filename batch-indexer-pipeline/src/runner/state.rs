//! Run-level state machine.
//!
//! The scheduler walks a run through these states; the pipeline itself
//! never retries, so the only transitions are forward progress or a
//! terminal failure carrying the failing stage.

use std::fmt;

/// The three pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Extract, Stage::Transform, Stage::Load];

    /// Stage name for logs and run reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::Load => "load",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one run as the scheduler drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Not yet started.
    Pending,
    /// Extract stage in progress.
    Extracting,
    /// Transform stage in progress.
    Transforming,
    /// Load stage in progress.
    Loading,
    /// All stages completed (possibly with document-level load failures).
    Succeeded,
    /// A stage exhausted its retries.
    Failed {
        stage: Stage,
        /// Error kind plus message, for run reporting.
        message: String,
    },
}

impl RunState {
    /// The in-progress state for a stage.
    pub fn running(stage: Stage) -> Self {
        match stage {
            Stage::Extract => RunState::Extracting,
            Stage::Transform => RunState::Transforming,
            Stage::Load => RunState::Loading,
        }
    }

    /// The stage currently running, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RunState::Extracting => Some(Stage::Extract),
            RunState::Transforming => Some(Stage::Transform),
            RunState::Loading => Some(Stage::Load),
            _ => None,
        }
    }

    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Pending => f.write_str("pending"),
            RunState::Extracting => f.write_str("extracting"),
            RunState::Transforming => f.write_str("transforming"),
            RunState::Loading => f.write_str("loading"),
            RunState::Succeeded => f.write_str("succeeded"),
            RunState::Failed { stage, message } => {
                write!(f, "failed at {}: {}", stage, message)
            }
        }
    }
}

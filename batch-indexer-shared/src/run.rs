//! Run identity and artifact addressing.
//!
//! A run is one scheduled execution of the pipeline. Each run owns two
//! persisted artifacts (staging and canonical), addressed by run id plus
//! artifact kind, so concurrent runs with distinct ids never collide.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identity of one pipeline execution.
///
/// Schedulers usually supply their own id; `RunId::generate` derives a
/// UTC-timestamp id for ad-hoc invocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Wrap an externally supplied run identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a run id from the current UTC time.
    pub fn generate() -> Self {
        Self(format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S%3fZ")))
    }

    /// The run id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two persisted artifact stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Raw extraction output, a verbatim copy of the source table.
    Staging,
    /// Cleaned and normalized output, consumed only by the loader.
    Canonical,
}

impl ArtifactKind {
    /// Stage name used when addressing the artifact in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Staging => "staging",
            ArtifactKind::Canonical => "canonical",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_display_roundtrip() {
        let run = RunId::new("manual-2024-11-02");
        assert_eq!(run.to_string(), "manual-2024-11-02");
        assert_eq!(run.as_str(), "manual-2024-11-02");
    }

    #[test]
    fn test_generated_run_id_has_prefix() {
        let run = RunId::generate();
        assert!(run.as_str().starts_with("run-"));
    }

    #[test]
    fn test_artifact_kind_names() {
        assert_eq!(ArtifactKind::Staging.as_str(), "staging");
        assert_eq!(ArtifactKind::Canonical.as_str(), "canonical");
    }
}

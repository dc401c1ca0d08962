//! Artifact store trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;
use batch_indexer_shared::{ArtifactKind, RunId, Table};

/// Durable storage for the per-run staging and canonical artifacts.
///
/// Artifacts are addressed by `(run, kind)`. Writes always overwrite:
/// each stage's output is the "latest snapshot" for that run, never a
/// history. This overwrite-on-write contract is what makes every stage
/// safe to re-invoke after a failure.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a tabular artifact, replacing any prior one at the same
    /// address. A failed write must not leave a partial artifact behind.
    async fn write_table(
        &self,
        run: &RunId,
        kind: ArtifactKind,
        table: &Table,
    ) -> Result<(), StoreError>;

    /// Read a previously persisted artifact.
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - Nothing was ever written at this
    ///   address (or it was removed out of band).
    async fn read_table(&self, run: &RunId, kind: ArtifactKind) -> Result<Table, StoreError>;
}

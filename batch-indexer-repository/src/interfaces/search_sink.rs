//! Search sink trait definition.

use async_trait::async_trait;

use crate::errors::SinkError;
use batch_indexer_shared::{IndexedDocument, LoadReport};

/// Abstract interface over the bulk-write search sink.
///
/// One operation: a single batched upsert of (id, body) documents into a
/// named index. Re-submitting the same identities overwrites the prior
/// documents, so the call is idempotent at the document level even though
/// it is not transactional. The sink creates the index implicitly on
/// first write; no mapping is pre-declared here.
#[async_trait]
pub trait SearchSink: Send + Sync {
    /// Upsert all documents into `index` in one bulk call.
    ///
    /// A per-document failure inside an otherwise accepted call is NOT an
    /// error: it is reported in the returned `LoadReport` so the caller
    /// can decide policy.
    ///
    /// # Errors
    ///
    /// * `SinkError::Unavailable` - The sink could not be reached; no
    ///   report exists and the whole call must be retried.
    /// * `SinkError::BulkError` - The sink rejected the bulk request as a
    ///   whole.
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[IndexedDocument],
    ) -> Result<LoadReport, SinkError>;
}

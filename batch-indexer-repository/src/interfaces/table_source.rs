//! Relational table source trait definition.

use async_trait::async_trait;

use crate::errors::SourceError;
use batch_indexer_shared::Table;

/// Abstract interface over the relational data source.
///
/// The source is read-only from the pipeline's point of view: one
/// operation, a full unfiltered read of a named table. Credentials and
/// connection targets belong to the implementation, not this contract.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Read all rows and all columns of the named table.
    ///
    /// The returned table is a faithful copy of the source at read time:
    /// no filtering, no pagination, no value transformation. Row `seq`
    /// numbers are assigned in read order starting at zero.
    ///
    /// # Errors
    ///
    /// * `SourceError::ConnectionError` - The source is unreachable or
    ///   rejected the credentials.
    /// * `SourceError::QueryError` - The table is missing or unreadable.
    async fn fetch_table(&self, table_name: &str) -> Result<Table, SourceError>;
}

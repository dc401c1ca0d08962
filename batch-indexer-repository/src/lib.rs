//! # Batch Indexer Repository
//!
//! This crate provides traits and implementations for the pipeline's
//! external collaborators: the relational table source, the durable
//! artifact store between stages, and the bulk-write search sink. It
//! includes definitions for errors, interfaces, and concrete
//! implementations backed by Postgres, CSV files, and OpenSearch.

pub mod csv_store;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;

pub use csv_store::CsvArtifactStore;
pub use errors::{SinkError, SourceError, StoreError};
pub use interfaces::{ArtifactStore, SearchSink, TableSource};
pub use opensearch::OpenSearchClient;
pub use postgres::PostgresTableSource;

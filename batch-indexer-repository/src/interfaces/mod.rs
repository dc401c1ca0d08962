//! Collaborator trait definitions.
//!
//! These traits are the seams between the pipeline stages and the outside
//! world. Implementations can be swapped for in-memory fakes in tests;
//! all of them must be `Send + Sync` for use across async tasks.

mod artifact_store;
mod search_sink;
mod table_source;

pub use artifact_store::ArtifactStore;
pub use search_sink::SearchSink;
pub use table_source::TableSource;

//! OpenSearch implementation of the search sink.

mod client;
mod response;

pub use client::OpenSearchClient;

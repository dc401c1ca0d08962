//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchSink`
//! using the OpenSearch Rust client. Documents are submitted as `index`
//! actions with explicit ids, which gives upsert semantics: re-running a
//! load overwrites the same documents instead of duplicating them.

use async_trait::async_trait;
use opensearch::http::request::JsonBody;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::{BulkParts, OpenSearch};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SinkError;
use crate::interfaces::SearchSink;
use crate::opensearch::response::parse_bulk_response;
use batch_indexer_shared::{IndexedDocument, LoadReport};

/// OpenSearch-backed `SearchSink`.
///
/// The target index is created implicitly by the server on first write;
/// no mapping is declared here.
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a client for the given server URL.
    pub fn new(url: &str) -> Result<Self, SinkError> {
        let parsed_url = Url::parse(url).map_err(|e| SinkError::unavailable(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SinkError::unavailable(e.to_string()))?;

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

#[async_trait]
impl SearchSink for OpenSearchClient {
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[IndexedDocument],
    ) -> Result<LoadReport, SinkError> {
        if documents.is_empty() {
            return Ok(LoadReport::empty());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            body.push(json!({ "index": { "_id": doc.id } }).into());
            body.push(doc.body.clone().into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SinkError::bulk(format!(
                "Bulk failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SinkError::invalid_response(e.to_string()))?;
        let report = parse_bulk_response(&response_body)?;

        if report.is_complete() {
            debug!(index = %index, count = report.total, "Bulk upsert accepted");
        } else {
            warn!(
                index = %index,
                total = report.total,
                failed = report.failed_count(),
                "Bulk upsert reported document failures"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn docs(n: usize) -> Vec<IndexedDocument> {
        (0..n)
            .map(|i| IndexedDocument::new(i.to_string(), json!({ "value": i })))
            .collect()
    }

    #[tokio::test]
    async fn test_bulk_upsert_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shopping/_bulk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 5,
                "errors": false,
                "items": [
                    { "index": { "_id": "0", "status": 201 } },
                    { "index": { "_id": "1", "status": 201 } }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenSearchClient::new(&server.uri()).unwrap();
        let report = client.bulk_upsert("shopping", &docs(2)).await.unwrap();

        assert_eq!(report.total, 2);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_bulk_upsert_partial_failure_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shopping/_bulk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 5,
                "errors": true,
                "items": [
                    { "index": { "_id": "0", "status": 201 } },
                    { "index": { "_id": "1", "status": 400,
                        "error": { "reason": "rejected" } } }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenSearchClient::new(&server.uri()).unwrap();
        let report = client.bulk_upsert("shopping", &docs(2)).await.unwrap();

        assert_eq!(report.succeeded, vec!["0"]);
        assert_eq!(report.failures[0].id, "1");
    }

    #[tokio::test]
    async fn test_bulk_upsert_server_error_is_bulk_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shopping/_bulk"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = OpenSearchClient::new(&server.uri()).unwrap();
        let err = client.bulk_upsert("shopping", &docs(1)).await.unwrap_err();
        assert!(matches!(err, SinkError::BulkError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_sink_is_unavailable() {
        // Nothing listens on this port.
        let client = OpenSearchClient::new("http://127.0.0.1:9").unwrap();
        let err = client.bulk_upsert("shopping", &docs(1)).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_submission_skips_the_sink() {
        // No mock server at all; an empty batch must not hit the network.
        let client = OpenSearchClient::new("http://127.0.0.1:9").unwrap();
        let report = client.bulk_upsert("shopping", &[]).await.unwrap();
        assert_eq!(report.total, 0);
    }
}

//! Typed Veryfi operations.
//!
//! This module defines the [`VeryfiProvider`] trait and implements it for
//! [`HttpClient`].

use crate::client::{DOCUMENT_URI, HttpClient};
use crate::error::Result;
use crate::options::Options;
use crate::scheme::{Document, DocumentUrlOptions};

/// Core trait for Veryfi document operations.
///
/// Implement this trait to substitute the HTTP client, e.g. in tests of code
/// that depends on Veryfi.
#[async_trait::async_trait]
pub trait VeryfiProvider: Send + Sync {
    /// Returns the resolved client options.
    fn config(&self) -> &Options;

    /// Processes the document available at `options.file_url`.
    ///
    /// Returns `Ok(None)` if Veryfi answered without a document and without a
    /// recognizable error body.
    async fn process_document_url(
        &self,
        options: &DocumentUrlOptions,
    ) -> Result<Option<Document>>;

    /// Fetches a previously processed document by its identifier.
    async fn get_document(&self, document_id: i64) -> Result<Option<Document>>;
}

#[async_trait::async_trait]
impl VeryfiProvider for HttpClient {
    fn config(&self) -> &Options {
        self.options()
    }

    async fn process_document_url(
        &self,
        options: &DocumentUrlOptions,
    ) -> Result<Option<Document>> {
        self.post(DOCUMENT_URI, options).await
    }

    async fn get_document(&self, document_id: i64) -> Result<Option<Document>> {
        let uri = format!("{DOCUMENT_URI}{document_id}/");
        self.get(&uri, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::Error;

    fn provider(server: &MockServer) -> Box<dyn VeryfiProvider> {
        let options = Options::new("abc", "u", "k")
            .with_environment_url(server.uri())
            .with_retry_count(1)
            .with_retry_wait_time(Duration::from_millis(10));

        Box::new(HttpClient::new_v7(options).unwrap())
    }

    #[tokio::test]
    async fn test_process_document_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v7/partner/documents/"))
            .and(header("authorization", "apikey u:k"))
            .and(body_json(json!({
                "file_url": "https://cdn.example.com/receipt.jpg",
                "tags": ["lunch"],
                "boost_mode": true,
                "auto_delete": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 31337,
                "total": 18.4,
                "currency_code": "USD",
                "vendor": { "name": "Noodle Bar" },
                "line_items": [{ "description": "Ramen", "total": 18.4 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let request = DocumentUrlOptions::new("https://cdn.example.com/receipt.jpg")
            .with_tags(["lunch"])
            .with_boost_mode(true);

        let document = provider
            .process_document_url(&request)
            .await
            .unwrap()
            .expect("Expected a document");

        assert_eq!(document.id, 31337);
        assert_eq!(document.total, Some(18.4));
        assert_eq!(document.currency_code.as_deref(), Some("USD"));
        assert_eq!(document.line_items.len(), 1);
    }

    #[tokio::test]
    async fn test_get_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v7/partner/documents/42/"))
            .and(header("client-id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let document = provider.get_document(42).await.unwrap();
        assert_eq!(document.map(|d| d.id), Some(42));
    }

    #[tokio::test]
    async fn test_get_document_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v7/partner/documents/404/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "http_code": 404,
                "description": "Document not found"
            })))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let err = provider.get_document(404).await.unwrap_err();

        assert!(matches!(err, Error::Server(_)));
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_config_is_resolved() {
        let server = MockServer::start().await;
        let provider = provider(&server);

        let config = provider.config();
        assert_eq!(config.http.retry.count, 1);
        assert_eq!(config.http.timeout(), crate::options::DEFAULT_TIMEOUT);
    }
}

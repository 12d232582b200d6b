//! Fetching status snapshots.

use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tracing::debug;

use super::types::StatusSnapshot;

/// Why a fetch produced no snapshot.
///
/// Every variant is handled the same way by the poller: the view shows the
/// message and the next tick tries again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS, or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-2xx status
    #[error("Failed to fetch dashboard data (HTTP {status})")]
    Status { status: u16 },

    /// Body did not match the snapshot shape
    #[error("malformed status response: {0}")]
    Malformed(String),
}

/// Anything that can produce a status snapshot
pub trait StatusSource: Send + Sync {
    /// Fetch the current snapshot
    fn fetch(&self) -> BoxFuture<'_, Result<StatusSnapshot, FetchError>>;
}

/// Status source backed by `GET <url>`
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    /// Build a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> Result<StatusSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!("Status fetch: {} bytes from {}", body.len(), self.url);

        parse_snapshot(&body)
    }
}

impl StatusSource for HttpStatusSource {
    fn fetch(&self) -> BoxFuture<'_, Result<StatusSnapshot, FetchError>> {
        Box::pin(self.fetch_once())
    }
}

/// Decode a response body into a snapshot
pub fn parse_snapshot(body: &[u8]) -> Result<StatusSnapshot, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::types::fixtures;

    #[test]
    fn test_parse_snapshot_ok() {
        let snapshot = parse_snapshot(fixtures::SAMPLE_JSON.as_bytes()).unwrap();
        assert_eq!(snapshot, fixtures::sample());
    }

    #[test]
    fn test_parse_snapshot_malformed() {
        let err = parse_snapshot(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = parse_snapshot(br#"{"timestamp": 5}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(
            err.to_string(),
            "Failed to fetch dashboard data (HTTP 503)"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let source =
            HttpStatusSource::new("http://127.0.0.1:9/api/status", Duration::from_secs(2)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    /// Serve one canned HTTP response on a local port, returning the URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/api/status", addr)
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let url = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let source = HttpStatusSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 503 });
    }

    #[tokio::test]
    async fn test_success_with_non_json_body_is_malformed() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;
        let source = HttpStatusSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_success_with_snapshot_body() {
        let url = serve_once("200 OK", fixtures::SAMPLE_JSON).await;
        let source = HttpStatusSource::new(url, Duration::from_secs(5)).unwrap();

        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot, fixtures::sample());
    }
}

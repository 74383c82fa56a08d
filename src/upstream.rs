//! Outbound fetches to the ping target.
//!
//! Handlers depend on the `Fetcher` trait rather than on reqwest directly, so the
//! production client can be swapped for a fake in tests. `HttpFetcher` wraps a
//! single pooled `reqwest::Client` shared by every request.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Url;

use crate::config::{UpstreamConfig, USER_AGENT};

/// Errors from a single outbound fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Upstream request timed out")]
    Timeout,

    #[error("Failed to connect to upstream: {0}")]
    Connect(String),

    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    #[error("Upstream request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // Connect timeouts report both flags; classify them as timeouts
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status)
        } else {
            FetchError::Other(e.to_string())
        }
    }
}

/// Performs a GET and returns the response body as text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// `Fetcher` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the client with the configured timeouts.
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| FetchError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(status = response.status().as_u16(), "Upstream responded");

        // The connection goes back to the pool once the body is consumed or dropped
        Ok(response.text().await?)
    }
}

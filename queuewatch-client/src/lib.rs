//! Queuewatch HTTP Client
//!
//! A small, type-safe HTTP client for the job-queue backend's read-only API.
//!
//! Every call resolves to a `Result<T, FetchError>`, and every error has an
//! [`ErrorKind`]: `Timeout`, `Network` (including non-2xx statuses) or
//! `Decode`. Callers that need a time bound wrap requests with
//! [`fetch::with_timeout`] or use [`QueueClient::fetch_json`].
//!
//! # Example
//!
//! ```no_run
//! use queuewatch_client::{QueueClient, fetch::DEFAULT_TIMEOUT};
//! use queuewatch_core::dto::status::StatusPayload;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QueueClient::new("http://localhost:5000");
//!
//!     let status: StatusPayload = client.fetch_json("/api/status", DEFAULT_TIMEOUT).await?;
//!     println!("queued: {:?}", status.queued);
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
pub mod fetch;
mod jobs;
mod status;

// Re-export commonly used types
pub use api::QueueApi;
pub use error::{ErrorKind, FetchError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP client for the job-queue backend
///
/// Covers the status, job list and worker list endpoints. Cloning is cheap;
/// clones share one connection pool.
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Base URL of the backend (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:5000")
    ///
    /// # Example
    /// ```
    /// use queuewatch_client::QueueClient;
    ///
    /// let client = QueueClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, connect timeouts, etc.
    ///
    /// # Example
    /// ```
    /// use queuewatch_client::QueueClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .connect_timeout(Duration::from_secs(2))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = QueueClient::with_client("http://localhost:5000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body, failing after `timeout`
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T> {
        fetch::with_timeout(timeout, self.get_json(path)).await
    }

    /// GET `path` and decode the JSON body, with no time bound
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    ///
    /// The body is read in full before decoding so that a broken connection
    /// reports as a request failure and a malformed body as a parse error.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| FetchError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl Default for QueueClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

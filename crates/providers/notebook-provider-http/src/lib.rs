//! Live backend over HTTP
//!
//! Talks to a document Q&A API (health, document listing, folder indexing,
//! chat) rooted at a base URL such as `http://localhost:8000/api/v1`.
//!
//! Failures stay failures: an unreachable server, a non-success status or a
//! payload that does not match the contract each surface as their own
//! [`NotebookError`] variant and are never turned into a canned answer.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use notebook_core::{
    validate_base_url, with_deadline, BackendMode, CancellationToken, ChatAnswer, ChatRequest,
    DocumentListing, HealthReport, IndexReport, IndexRequest, ListQuery, NotebookBackend,
    NotebookConfig, NotebookError, Result,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest response body accepted from the backend
pub const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// Connection settings of [`HttpBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBackendConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Deadline for a whole request
    pub request_timeout: Duration,
    /// Deadline for establishing the connection
    pub connect_timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: notebook_core::DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&NotebookConfig> for HttpBackendConfig {
    fn from(config: &NotebookConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            request_timeout: config.request_timeout,
            connect_timeout: config.connect_timeout,
        }
    }
}

/// Client for a real document Q&A backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Create a backend client with its own connection pool
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built
    pub fn new(mut config: HttpBackendConfig) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        validate_base_url(&config.base_url)?;

        let client = Client::builder()
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(300))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| NotebookError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Client for the backend at `base_url` with default timeouts
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(HttpBackendConfig {
            base_url: base_url.into(),
            ..HttpBackendConfig::default()
        })
    }

    /// API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send a request and decode the JSON body, under the caller's token and
    /// the configured request deadline.
    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let result = with_deadline(self.config.request_timeout, cancel, async {
            let response = request.send().await.map_err(|e| self.transport_error(e))?;
            let status = response.status();
            let body = self.read_body(response).await;

            if !status.is_success() {
                let body = match body {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(NotebookError::MalformedPayload(reason)) => reason,
                    Err(e) => return Err(e),
                };
                return Err(NotebookError::upstream(status.as_u16(), body));
            }
            serde_json::from_slice::<T>(&body?)
                .map_err(|e| NotebookError::malformed(format!("{} response: {}", operation, e)))
        })
        .await;

        match &result {
            Ok(_) => debug!("{} succeeded", operation),
            Err(NotebookError::Cancelled(_)) => debug!("{} cancelled", operation),
            Err(e) => warn!("{} failed against {}: {}", operation, self.config.base_url, e),
        }
        result
    }

    /// Read the body chunk by chunk, giving up as soon as it passes
    /// [`MAX_RESPONSE_BYTES`].
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>> {
        if let Some(length) = response.content_length() {
            if length > MAX_RESPONSE_BYTES as u64 {
                return Err(too_large(length));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.transport_error(e))? {
            if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
                return Err(too_large((body.len() + chunk.len()) as u64));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> NotebookError {
        if e.is_timeout() {
            NotebookError::timeout(format!(
                "no answer from {} within {:.1}s",
                self.config.base_url,
                self.config.request_timeout.as_secs_f64()
            ))
        } else {
            NotebookError::Network(e)
        }
    }
}

fn too_large(length: u64) -> NotebookError {
    NotebookError::malformed(format!(
        "Response too large: at least {} bytes (max {} bytes)",
        length,
        MAX_RESPONSE_BYTES
    ))
}

#[async_trait]
impl NotebookBackend for HttpBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    async fn health(&self, cancel: CancellationToken) -> Result<HealthReport> {
        let request = self.client.get(self.url("/health"));
        self.fetch("health", request, &cancel).await
    }

    async fn list_documents(
        &self,
        limit: usize,
        cancel: CancellationToken,
    ) -> Result<DocumentListing> {
        let request = self
            .client
            .get(self.url("/documents/list"))
            .query(&ListQuery { limit });
        self.fetch("list_documents", request, &cancel).await
    }

    async fn index_folder(
        &self,
        request: IndexRequest,
        cancel: CancellationToken,
    ) -> Result<IndexReport> {
        let request = self
            .client
            .post(self.url("/documents/index"))
            .json(&request);
        self.fetch("index_folder", request, &cancel).await
    }

    async fn chat(&self, request: ChatRequest, cancel: CancellationToken) -> Result<ChatAnswer> {
        let request = self.client.post(self.url("/chat/message")).json(&request);
        self.fetch("chat", request, &cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = HttpBackend::with_base_url("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            backend.url("/chat/message"),
            "http://localhost:8000/api/v1/chat/message"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::with_base_url("localhost:8000"),
            Err(NotebookError::Config(_))
        ));
        assert!(HttpBackend::with_base_url("").is_err());
    }

    #[test]
    fn test_config_from_notebook_config() {
        let notebook = NotebookConfig {
            api_base_url: "http://10.0.0.5:9000/api/v1".into(),
            request_timeout: Duration::from_secs(5),
            ..NotebookConfig::default()
        };
        let config = HttpBackendConfig::from(&notebook);
        assert_eq!(config.base_url, "http://10.0.0.5:9000/api/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_mode() {
        let backend = HttpBackend::new(HttpBackendConfig::default()).unwrap();
        assert_eq!(backend.mode(), BackendMode::Live);
    }
}

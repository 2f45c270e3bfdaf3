//! Error types for Local Notebook

use thiserror::Error;

/// Main error type for Local Notebook operations
#[derive(Debug, Error)]
pub enum NotebookError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (bad knowledge table, bad request parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/HTTP transport error (connection refused, DNS, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Upstream returned status {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The backend answered with a payload that does not match the contract
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The caller abandoned the request
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

/// Convenient Result type using NotebookError
pub type Result<T> = std::result::Result<T, NotebookError>;

impl NotebookError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        NotebookError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        NotebookError::Validation(msg.into())
    }

    /// Create an upstream status error, keeping at most 512 bytes of body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 512 {
            let mut cut = 512;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        NotebookError::Upstream { status, body }
    }

    /// Create a malformed payload error
    pub fn malformed(msg: impl Into<String>) -> Self {
        NotebookError::MalformedPayload(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        NotebookError::Timeout(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        NotebookError::Cancelled(msg.into())
    }

    /// True when the error means the backend is unreachable or misbehaving,
    /// as opposed to a local configuration or input problem.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            NotebookError::Network(_)
                | NotebookError::Upstream { .. }
                | NotebookError::MalformedPayload(_)
                | NotebookError::Timeout(_)
        )
    }
}

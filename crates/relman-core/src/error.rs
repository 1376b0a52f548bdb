//! Error types for the Relman library.
//!
//! Every failure path in the editor is recoverable; these types exist so
//! callers can tell "re-show the form" errors (parse, lookup) apart from
//! transient collaborator failures (network, rate limits).

use crate::config::NetworkConfig;
use thiserror::Error;

/// Main error type for Relman operations.
#[derive(Debug, Error)]
pub enum RelmanError {
    // Manifest errors
    #[error("Manifest parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Lookup failed: {message}")]
    Lookup { message: String },

    // Collaborator errors
    #[error("Fetch failed with HTTP status {status}")]
    Fetch { status: u16 },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // File system errors (tag cache disk tier)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for Relman operations.
pub type Result<T> = std::result::Result<T, RelmanError>;

// Conversion implementations for common error types

impl From<std::io::Error> for RelmanError {
    fn from(err: std::io::Error) -> Self {
        RelmanError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RelmanError {
    fn from(err: serde_json::Error) -> Self {
        RelmanError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for RelmanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // The client is always built with the configured timeout.
            RelmanError::Timeout(NetworkConfig::REQUEST_TIMEOUT)
        } else {
            RelmanError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl RelmanError {
    /// Create a parse error from a message alone.
    pub fn parse(message: impl Into<String>) -> Self {
        RelmanError::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lookup error from a message.
    pub fn lookup(message: impl Into<String>) -> Self {
        RelmanError::Lookup {
            message: message.into(),
        }
    }

    /// Check if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RelmanError::Network { .. } | RelmanError::Timeout(_) => true,
            RelmanError::Fetch { status } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

//! Error types for the Fotonom orchestration core.
//!
//! The pipeline surface is infallible; errors circulate only at the seams
//! that can actually fail (config loading, provider calls, the counter
//! store), carrying enough context (provider name, status code) to be
//! actionable in logs and retry decisions.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// A failed call to a vision provider.
///
/// The HTTP status code, when present, is captured once at the call site so
/// the retry loop can classify the failure without inspecting message text.
#[derive(Error, Debug)]
#[error("{provider}: {message}")]
pub struct ProviderError {
    /// Provider name ("huggingface", "openai")
    pub provider: &'static str,
    /// Human-readable failure description
    pub message: String,
    /// HTTP status code, if the failure was an HTTP-level rejection
    pub status_code: Option<u16>,
}

impl ProviderError {
    /// An HTTP-level failure with a status code.
    pub fn http(provider: &'static str, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// A transport or parse failure with no HTTP status.
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
            status_code: None,
        }
    }

    /// Whether retrying this call within the same request can help.
    ///
    /// Auth rejections (401/403) and "model is loading" (503) will not
    /// resolve within a single request; everything else (timeouts, other
    /// 5xx, network errors, malformed responses) is worth retrying.
    pub fn retryable(&self) -> bool {
        !matches!(self.status_code, Some(401) | Some(403) | Some(503))
    }
}

/// A failed call to the external counter store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_not_retryable() {
        let err = ProviderError::http("openai", 401, "unauthorized");
        assert!(!err.retryable());
        let err = ProviderError::http("openai", 403, "forbidden");
        assert!(!err.retryable());
    }

    #[test]
    fn test_unavailable_not_retryable() {
        let err = ProviderError::http("huggingface", 503, "model is loading");
        assert!(!err.retryable());
    }

    #[test]
    fn test_server_error_retryable() {
        let err = ProviderError::http("huggingface", 500, "internal error");
        assert!(err.retryable());
        let err = ProviderError::http("openai", 429, "rate limited");
        assert!(err.retryable());
    }

    #[test]
    fn test_transport_error_retryable() {
        let err = ProviderError::transport("openai", "connection refused");
        assert!(err.retryable());
    }

    #[test]
    fn test_display_includes_provider() {
        let err = ProviderError::http("huggingface", 500, "boom");
        assert_eq!(err.to_string(), "huggingface: boom");
    }
}

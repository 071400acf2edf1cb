//! Sub-configuration structs with the core's tuned defaults.

use super::resolve_env_var;
use serde::{Deserialize, Serialize};

/// Task queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Max analysis pipelines running concurrently
    pub max_parallel: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_parallel: 3 }
    }
}

/// Provider rate limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Max provider calls per rolling window
    pub max_requests: usize,

    /// Rolling window duration in milliseconds
    pub window_ms: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_ms: 60_000,
        }
    }
}

/// Retry/backoff settings for provider calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per provider before advancing to the next one
    pub attempts: u32,

    /// Base backoff delay in milliseconds (doubles per attempt)
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Vision provider configurations.
///
/// A provider participates in the chain only when its API key resolves to a
/// real value — unset env vars and placeholder strings both count as
/// "not configured".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Hugging Face (primary, image captioning)
    pub huggingface: HuggingFaceConfig,

    /// OpenAI (fallback, vision chat completion)
    pub openai: OpenAiConfig,

    /// Key values treated as "not configured" (committed sample keys etc.)
    pub placeholders: Vec<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            huggingface: HuggingFaceConfig::default(),
            openai: OpenAiConfig::default(),
            placeholders: vec![
                "changeme".to_string(),
                "your-api-key".to_string(),
                "test".to_string(),
            ],
        }
    }
}

impl ProvidersConfig {
    /// Resolve a configured key, rejecting placeholder values.
    pub fn credential(&self, raw: &str) -> Option<String> {
        let resolved = resolve_env_var(raw)?;
        if self.placeholders.iter().any(|p| p == &resolved) {
            return None;
        }
        Some(resolved)
    }
}

/// Hugging Face captioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    /// Inference endpoint of the captioning model
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint:
                "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-large"
                    .to_string(),
            api_key: "${HUGGINGFACE_API_KEY}".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// OpenAI vision chat-completion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Chat completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_rejects_placeholder() {
        let providers = ProvidersConfig::default();
        assert_eq!(providers.credential("changeme"), None);
        assert_eq!(providers.credential("test"), None);
        assert_eq!(
            providers.credential("hf_real_key"),
            Some("hf_real_key".to_string())
        );
    }

    #[test]
    fn test_credential_rejects_unset_env_var() {
        let providers = ProvidersConfig::default();
        assert_eq!(providers.credential("${FOTONOM_NOT_SET_ABC}"), None);
        assert_eq!(providers.credential(""), None);
    }
}

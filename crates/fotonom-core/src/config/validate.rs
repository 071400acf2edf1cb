//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.max_parallel == 0 {
            return Err(ConfigError::ValidationError(
                "queue.max_parallel must be > 0".into(),
            ));
        }
        if self.limiter.max_requests == 0 {
            return Err(ConfigError::ValidationError(
                "limiter.max_requests must be > 0".into(),
            ));
        }
        if self.limiter.window_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limiter.window_ms must be > 0".into(),
            ));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.attempts must be > 0".into(),
            ));
        }
        if self.providers.huggingface.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "providers.huggingface.timeout_ms must be > 0".into(),
            ));
        }
        if self.providers.openai.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "providers.openai.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

//! Vision provider trait and the image payload helper.

use crate::error::ProviderError;
use crate::types::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to a provider API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type sniffed from the bytes (e.g., "image/jpeg")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes, sniffing the format from the
    /// file signature.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let media_type = match bytes {
            [0xFF, 0xD8, ..] => "image/jpeg",
            [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
            [b'G', b'I', b'F', b'8', ..] => "image/gif",
            _ => "image/jpeg",
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the client holds `Vec<Arc<dyn VisionProvider>>` for the priority chain).
///
/// Implementations return raw, unsanitized tokens; the client sanitizes
/// before anything reaches a caller.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "huggingface", "openai").
    fn name(&self) -> &'static str;

    /// Classify the photo into a (location, scene) pair.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ProviderError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}

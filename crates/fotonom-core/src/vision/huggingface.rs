//! Hugging Face captioning provider (primary).
//!
//! Posts raw image bytes to a BLIP image-captioning endpoint and derives
//! (location, scene) from the returned caption via keyword extraction.

use super::caption;
use super::provider::VisionProvider;
use crate::error::ProviderError;
use crate::types::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "huggingface";

pub struct HuggingFaceProvider {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct CaptionItem {
    generated_text: Option<String>,
}

/// Extract the caption text from the model's response body.
fn parse_caption(body: &str) -> Result<String, ProviderError> {
    let items: Vec<CaptionItem> = serde_json::from_str(body).map_err(|e| {
        ProviderError::transport(PROVIDER, format!("unexpected caption response: {e}"))
    })?;
    items
        .first()
        .and_then(|item| item.generated_text.clone())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ProviderError::transport(PROVIDER, "no caption text generated"))
}

#[async_trait]
impl VisionProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ProviderError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/octet-stream")
            .body(request.image.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::http(
                PROVIDER,
                status.as_u16(),
                format!("caption HTTP {status}: {text}"),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, format!("body read failed: {e}")))?;
        let caption = parse_caption(&body)?;
        tracing::debug!("caption for {}: \"{caption}\"", request.file_name);

        Ok(AnalysisResult::new(
            caption::location_from_caption(&caption).unwrap_or(caption::UNKNOWN_LOCATION),
            caption::scene_from_caption(&caption).unwrap_or(caption::DEFAULT_SCENE),
        ))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

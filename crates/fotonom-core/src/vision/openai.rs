//! OpenAI vision provider (fallback) using the Chat Completions API.
//!
//! Sends the image as a data URL and asks for a strict JSON reply carrying
//! the German location/scene classification.

use super::provider::{ImageInput, VisionProvider};
use crate::error::ProviderError;
use crate::types::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "openai";

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the German classification prompt, weaving in the reverse-geocoded
/// place name when the photo carries one.
fn build_prompt(place_hint: Option<&str>) -> String {
    let place_context = match place_hint {
        Some(place) => format!(
            "\n\nZusätzliche Kontext-Information: Das Foto wurde aufgenommen bei/in \
             \"{place}\". Wenn dies ein spezifischer Ort ist, verwende diesen Namen als \
             Ort-Kategorie. Ansonsten verwende eine allgemeine Kategorie."
        ),
        None => String::new(),
    };

    format!(
        "Analysiere dieses Bild und bestimme:\n\
         1. Die Ort-Kategorie (z.B. Strand, Restaurant, Auto, Wald, Park, Büro, Zuhause) \
         - maximal 2-3 Wörter auf Deutsch\n\
         2. Eine Szene-Beschreibung mit einem Adjektiv/Wort auf Deutsch \
         (z.B. sonnig, gemütlich, modern, dunkel){place_context}\n\n\
         Falls im Bild ein Schild zu sehen ist: verwende \"Schild\" als Ort-Kategorie und \
         den wichtigsten Text auf dem Schild als Szene-Beschreibung, mit Bindestrichen \
         statt Leerzeichen.\n\n\
         Antworte nur in folgendem JSON-Format:\n\
         {{\n  \"location\": \"Ort-Kategorie\",\n  \"scene\": \"Szene-Beschreibung\"\n}}\n\n\
         Verwende nur deutsche Begriffe, kurz und prägnant, mit Bindestrichen statt \
         Leerzeichen (z.B. \"Central-Park\" statt \"Central Park\")."
    )
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Classification {
    location: Option<String>,
    scene: Option<String>,
}

/// Parse the model's JSON reply into a result; missing or empty fields are
/// a provider failure.
fn parse_classification(content: &str) -> Result<AnalysisResult, ProviderError> {
    let parsed: Classification = serde_json::from_str(content).map_err(|e| {
        ProviderError::transport(PROVIDER, format!("reply is not the expected JSON: {e}"))
    })?;
    match (parsed.location, parsed.scene) {
        (Some(location), Some(scene)) if !location.is_empty() && !scene.is_empty() => {
            Ok(AnalysisResult::new(location, scene))
        }
        _ => Err(ProviderError::transport(
            PROVIDER,
            "incomplete classification in reply",
        )),
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ProviderError> {
        let image = ImageInput::from_bytes(&request.image);

        let body = ChatRequest {
            model: self.model.clone(),
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            max_tokens: 200,
            temperature: 0.3,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: build_prompt(request.place_hint.as_deref()),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
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
                format!("HTTP {status}: {text}"),
            ));
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::transport(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        let content = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::transport(PROVIDER, "empty choices array"))?;

        parse_classification(&content)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classification() {
        let result =
            parse_classification(r#"{"location": "Strand", "scene": "sonnig"}"#).unwrap();
        assert_eq!(result, AnalysisResult::new("Strand", "sonnig"));
    }

    #[test]
    fn test_parse_classification_missing_field() {
        assert!(parse_classification(r#"{"location": "Strand"}"#).is_err());
        assert!(parse_classification(r#"{"location": "", "scene": "sonnig"}"#).is_err());
    }

    #[test]
    fn test_parse_classification_not_json() {
        let err = parse_classification("Strand, sonnig").unwrap_err();
        assert!(err.retryable());
    }

    #[test]
    fn test_prompt_includes_place_hint() {
        let prompt = build_prompt(Some("Englischer Garten"));
        assert!(prompt.contains("Englischer Garten"));
        assert!(!build_prompt(None).contains("Kontext-Information"));
    }
}

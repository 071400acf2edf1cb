//! Multi-provider vision client with retry and deterministic fallback.
//!
//! `analyze` never fails and never returns an empty field: provider output
//! is sanitized, exhausted provider chains collapse into the deterministic
//! name-derived fallback, and an empty image short-circuits to an error
//! marker result without touching any provider.

use super::fallback;
use super::huggingface::HuggingFaceProvider;
use super::openai::OpenAiProvider;
use super::provider::VisionProvider;
use super::retry;
use super::sanitize::sanitize;
use crate::config::Config;
use crate::types::{AnalysisRequest, AnalysisResult};
use std::sync::Arc;
use std::time::Duration;

/// Marker result for an empty or unreadable image.
fn invalid_image_result() -> AnalysisResult {
    AnalysisResult::new("Unbekannt", "Fehler")
}

pub struct VisionClient {
    /// Enabled providers in priority order.
    providers: Vec<Arc<dyn VisionProvider>>,
    /// Calls per provider before advancing to the next one.
    attempts: u32,
    /// Base backoff delay between attempts.
    base_delay_ms: u64,
}

impl VisionClient {
    pub fn new(providers: Vec<Arc<dyn VisionProvider>>, attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            providers,
            attempts: attempts.max(1),
            base_delay_ms,
        }
    }

    /// Build the provider chain from configuration.
    ///
    /// A provider joins the chain only when its credential resolves to a
    /// real (non-placeholder) value; with no credentials at all the chain is
    /// empty and every photo gets the deterministic fallback.
    pub fn from_config(config: &Config) -> Self {
        let mut providers: Vec<Arc<dyn VisionProvider>> = Vec::new();

        let hf = &config.providers.huggingface;
        if let Some(key) = config.providers.credential(&hf.api_key) {
            providers.push(Arc::new(HuggingFaceProvider::new(
                &key,
                &hf.endpoint,
                Duration::from_millis(hf.timeout_ms),
            )));
        } else {
            tracing::info!("huggingface credential not configured, provider disabled");
        }

        let oa = &config.providers.openai;
        if let Some(key) = config.providers.credential(&oa.api_key) {
            providers.push(Arc::new(OpenAiProvider::new(
                &key,
                &oa.model,
                &oa.endpoint,
                Duration::from_millis(oa.timeout_ms),
            )));
        } else {
            tracing::info!("openai credential not configured, provider disabled");
        }

        Self::new(providers, config.retry.attempts, config.retry.base_delay_ms)
    }

    /// Number of enabled providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Classify a photo. Infallible: every code path ends in a usable,
    /// non-empty, filename-safe result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        if request.image.is_empty() {
            tracing::warn!("empty image for {}, skipping providers", request.file_name);
            return invalid_image_result();
        }

        for provider in &self.providers {
            if let Some(result) = self.try_provider(provider.as_ref(), request).await {
                tracing::info!(
                    "{} classified {}: {}/{}",
                    provider.name(),
                    request.file_name,
                    result.location,
                    result.scene
                );
                return result;
            }
        }

        tracing::warn!(
            "all providers exhausted for {}, using deterministic fallback",
            request.file_name
        );
        fallback::deterministic(&request.file_name)
    }

    /// Run one provider through the retry schedule.
    ///
    /// Returns `None` when the provider is abandoned — either retries were
    /// exhausted or a non-retryable failure (auth, model loading) made
    /// further attempts pointless.
    async fn try_provider(
        &self,
        provider: &dyn VisionProvider,
        request: &AnalysisRequest,
    ) -> Option<AnalysisResult> {
        for attempt in 0..self.attempts {
            if attempt > 0 {
                let delay = retry::backoff_duration(attempt - 1, self.base_delay_ms);
                tracing::debug!(
                    "retry {attempt}/{} against {} for {} after {delay:?}",
                    self.attempts - 1,
                    provider.name(),
                    request.file_name
                );
                tokio::time::sleep(delay).await;
            }

            match tokio::time::timeout(provider.timeout(), provider.analyze(request)).await {
                Ok(Ok(raw)) => {
                    let location = sanitize(&raw.location);
                    let scene = sanitize(&raw.scene);
                    if location.is_empty() || scene.is_empty() {
                        tracing::warn!(
                            "{} returned unusable tokens for {}, retrying",
                            provider.name(),
                            request.file_name
                        );
                        continue;
                    }
                    return Some(AnalysisResult::new(location, scene));
                }
                Ok(Err(e)) => {
                    if !e.retryable() {
                        tracing::warn!(
                            "{} failed non-retryably for {}: {e}",
                            provider.name(),
                            request.file_name
                        );
                        return None;
                    }
                    tracing::warn!("{} failed for {}: {e}", provider.name(), request.file_name);
                }
                Err(_) => {
                    tracing::warn!(
                        "{} timed out after {:?} for {}",
                        provider.name(),
                        provider.timeout(),
                        request.file_name
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    type ResponseFn = Box<dyn Fn(u32) -> Result<AnalysisResult, ProviderError> + Send + Sync>;

    /// Mock provider whose response depends on the call index, so a test
    /// can fail the first attempt and succeed on the second.
    struct MockProvider {
        provider_name: &'static str,
        response_fn: ResponseFn,
        call_count: Arc<AtomicU32>,
    }

    impl MockProvider {
        fn new(
            provider_name: &'static str,
            response_fn: impl Fn(u32) -> Result<AnalysisResult, ProviderError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                provider_name,
                response_fn: Box::new(response_fn),
                call_count: Arc::new(AtomicU32::new(0)),
            }
        }

        fn success(provider_name: &'static str, location: &str, scene: &str) -> Self {
            let location = location.to_string();
            let scene = scene.to_string();
            Self::new(provider_name, move |_| {
                Ok(AnalysisResult::new(location.clone(), scene.clone()))
            })
        }

        fn failing(provider_name: &'static str, status_code: Option<u16>) -> Self {
            Self::new(provider_name, move |_| {
                Err(match status_code {
                    Some(code) => ProviderError::http(provider_name, code, "mock failure"),
                    None => ProviderError::transport(provider_name, "mock failure"),
                })
            })
        }

        fn call_count_handle(&self) -> Arc<AtomicU32> {
            self.call_count.clone()
        }
    }

    #[async_trait]
    impl VisionProvider for MockProvider {
        fn name(&self) -> &'static str {
            self.provider_name
        }

        async fn analyze(
            &self,
            _request: &AnalysisRequest,
        ) -> Result<AnalysisResult, ProviderError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.response_fn)(idx)
        }
    }

    fn request(file_name: &str) -> AnalysisRequest {
        AnalysisRequest::new(vec![0xFF, 0xD8, 0xFF], file_name, None)
    }

    fn client(providers: Vec<Arc<dyn VisionProvider>>) -> VisionClient {
        VisionClient::new(providers, 3, 10)
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_image_skips_providers() {
        let provider = MockProvider::success("a", "Strand", "sonnig");
        let calls = provider.call_count_handle();
        let client = client(vec![Arc::new(provider)]);

        let result = client
            .analyze(&AnalysisRequest::new(vec![], "leer.jpg", None))
            .await;

        assert_eq!(result, AnalysisResult::new("Unbekannt", "Fehler"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_sanitized() {
        let provider = MockProvider::success("a", "Central Park", "  sonnig!  ");
        let client = client(vec![Arc::new(provider)]);

        let result = client.analyze(&request("foto.jpg")).await;
        assert_eq!(result, AnalysisResult::new("Central-Park", "sonnig"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_provider_not_retried() {
        // Provider A fails with 503 — abandoned after one call, B takes over
        let a = MockProvider::failing("a", Some(503));
        let a_calls = a.call_count_handle();
        let b = MockProvider::success("b", "Park", "hell");
        let b_calls = b.call_count_handle();
        let client = client(vec![Arc::new(a), Arc::new(b)]);

        let result = client.analyze(&request("foto.jpg")).await;

        assert_eq!(result, AnalysisResult::new("Park", "hell"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_not_retried() {
        let a = MockProvider::failing("a", Some(401));
        let a_calls = a.call_count_handle();
        let client = client(vec![Arc::new(a)]);

        client.analyze(&request("foto.jpg")).await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_then_succeeds() {
        let a = MockProvider::new("a", |idx| {
            if idx == 0 {
                Err(ProviderError::http("a", 500, "flaky"))
            } else {
                Ok(AnalysisResult::new("Wald", "dunkel"))
            }
        });
        let a_calls = a.call_count_handle();
        let client = client(vec![Arc::new(a)]);

        let result = client.analyze(&request("foto.jpg")).await;

        assert_eq!(result, AnalysisResult::new("Wald", "dunkel"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_through_to_next_provider() {
        let a = MockProvider::failing("a", Some(500));
        let a_calls = a.call_count_handle();
        let b = MockProvider::success("b", "Auto", "modern");
        let client = client(vec![Arc::new(a), Arc::new(b)]);

        let result = client.analyze(&request("foto.jpg")).await;

        assert_eq!(result, AnalysisResult::new("Auto", "modern"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_providers_yields_deterministic_fallback() {
        let client = client(vec![]);

        let first = client.analyze(&request("urlaub_042.jpg")).await;
        let second = client.analyze(&request("urlaub_042.jpg")).await;

        assert_eq!(first, second);
        assert!(!first.location.is_empty());
        assert!(!first.scene.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_providers_failing_yields_fallback() {
        let a = MockProvider::failing("a", Some(500));
        let b = MockProvider::failing("b", None);
        let client = client(vec![Arc::new(a), Arc::new(b)]);

        let result = client.analyze(&request("strandtag.jpg")).await;
        assert_eq!(result, fallback::deterministic("strandtag.jpg"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_tokens_count_as_failure() {
        // Sanitization strips everything — provider output is unusable
        let a = MockProvider::success("a", "!!!", "???");
        let a_calls = a.call_count_handle();
        let client = client(vec![Arc::new(a)]);

        let result = client.analyze(&request("foto.jpg")).await;

        assert_eq!(a_calls.load(Ordering::SeqCst), 3);
        assert_eq!(result, fallback::deterministic("foto.jpg"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_never_empty() {
        for name in ["", "foto.jpg", "....", "äöü.png"] {
            let client = client(vec![]);
            let result = client.analyze(&request(name)).await;
            assert!(!result.location.is_empty(), "empty location for {name:?}");
            assert!(!result.scene.is_empty(), "empty scene for {name:?}");
        }
    }
}

use crate::llm::config::{ProviderConfig, ProviderKind};
use crate::llm::observer::{LlmEvent, LlmObserver, NoopObserver};
use crate::llm::prompts::{build_prompt, Prompt, PromptMetadata};
use crate::llm::providers::{CompletionProvider, Provider};
use crate::llm::result::{LlmFailure, LlmResult, ProviderErrorKind};
use crate::reply::context::PromptRequest;
use crate::reply::validation::ValidationError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while setting up the client
#[derive(Debug, Error)]
pub enum LlmClientError {
    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(String),
}

/// Prompt, metadata and provider outcome of one drafting request
#[derive(Debug, Clone, Serialize)]
pub struct DraftOutcome {
    pub prompt: Prompt,
    pub metadata: PromptMetadata,
    pub result: LlmResult,
}

/// Client that sends prompts to the provider chosen at construction
///
/// Holds no per-call state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct LlmClient {
    provider: Provider,
    timeout: Duration,
    observer: Arc<dyn LlmObserver>,
}

impl LlmClient {
    /// Create a client from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, LlmClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("replypilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LlmClientError::HttpClient(e.to_string()))?;

        Ok(Self {
            provider: Provider::select(config, &http),
            timeout: Duration::from_secs(config.timeout_secs),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self, LlmClientError> {
        Self::new(&ProviderConfig::from_env())
    }

    pub fn with_observer(mut self, observer: Arc<dyn LlmObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a prompt to the selected provider, bounded by the configured timeout
    pub async fn generate(&self, prompt: &Prompt) -> LlmResult {
        self.generate_with_timeout(prompt, self.timeout).await
    }

    /// Like [`generate`](Self::generate) with a caller-imposed bound
    ///
    /// The effective bound is the smaller of `bound` and the configured
    /// timeout. When it elapses the in-flight request is dropped and a
    /// `Timeout` failure is returned.
    pub async fn generate_with_timeout(&self, prompt: &Prompt, bound: Duration) -> LlmResult {
        self.observed_call(&self.provider, prompt, bound).await
    }

    async fn observed_call<P>(&self, provider: &P, prompt: &Prompt, requested: Duration) -> LlmResult
    where
        P: CompletionProvider + ?Sized,
    {
        let bound = requested.min(self.timeout);
        let correlation_id = Uuid::new_v4();

        self.observer.on_event(&LlmEvent::CallStarted {
            correlation_id,
            provider: provider.name().to_string(),
            model: self.model().to_string(),
            prompt_length: prompt.char_len(),
            timeout_ms: bound.as_millis() as u64,
        });

        let result = dispatch(provider, prompt, bound, correlation_id).await;

        let event = match &result {
            LlmResult::Success(reply) => LlmEvent::CallSucceeded {
                correlation_id,
                provider: reply.provider.clone(),
                model_id: reply.model_id.clone(),
                latency_ms: reply.latency_ms,
                reply_length: reply.text.chars().count(),
            },
            LlmResult::Failure(failure) => LlmEvent::CallFailed {
                correlation_id,
                provider: failure.provider.clone(),
                kind: failure.kind,
                retryable: failure.retryable,
            },
        };
        self.observer.on_event(&event);

        result
    }

    /// Build the prompt for `request` and generate a reply for it
    pub async fn draft_reply(&self, request: &PromptRequest) -> Result<DraftOutcome, ValidationError> {
        let (prompt, metadata) = build_prompt(request)?;
        self.observer.on_event(&LlmEvent::prompt_assembled(&metadata));

        let result = self.generate(&prompt).await;
        Ok(DraftOutcome {
            prompt,
            metadata,
            result,
        })
    }
}

/// Run one provider call under `bound`
///
/// A timeout failure carries `request_id`, so it can be matched with the
/// call's observer events.
pub(crate) async fn dispatch<P>(provider: &P, prompt: &Prompt, bound: Duration, request_id: Uuid) -> LlmResult
where
    P: CompletionProvider + ?Sized,
{
    match tokio::time::timeout(bound, provider.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => LlmFailure::new(
            ProviderErrorKind::Timeout,
            provider.name(),
            format!("Request exceeded the {} ms timeout.", bound.as_millis()),
            request_id,
        )
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::config::{ApiKey, ProviderCredentials};
    use crate::llm::providers::mock::MOCK_REPLY;
    use crate::reply::context::PostContext;
    use crate::reply::preset::{Intent, ReplyLength, ReplyPreset, Tone};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<LlmEvent>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<LlmEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl LlmObserver for RecordingObserver {
        fn on_event(&self, event: &LlmEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl CompletionProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn complete(&self, _prompt: &Prompt) -> LlmResult {
            tokio::time::sleep(Duration::from_secs(30)).await;
            panic!("should have been cancelled");
        }
    }

    fn credentials(key: &str, model: &str, base: &str) -> ProviderCredentials {
        ProviderCredentials::new(ApiKey::new(key).unwrap(), model).with_api_base(base)
    }

    fn series_a_request() -> PromptRequest {
        PromptRequest::new(
            PostContext::new("Alex", "Excited to announce our Series A!"),
            ReplyPreset::new(Tone::Enthusiastic, ReplyLength::Short, Intent::Congratulate),
        )
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlmClient>();
    }

    #[test]
    fn test_selection_priority() {
        let both = ProviderConfig::default()
            .with_anthropic(credentials("a", "claude", "http://localhost"))
            .with_openai(credentials("o", "gpt-4o", "http://localhost"));
        assert_eq!(LlmClient::new(&both).unwrap().provider_kind(), ProviderKind::Anthropic);

        let secondary = ProviderConfig::default().with_openai(credentials("o", "gpt-4o", "http://localhost"));
        assert_eq!(LlmClient::new(&secondary).unwrap().provider_kind(), ProviderKind::OpenAi);

        let none = ProviderConfig::default();
        let client = LlmClient::new(&none).unwrap();
        assert_eq!(client.provider_kind(), ProviderKind::Mock);
        assert_eq!(client.provider_name(), "mock");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_series_a_against_mock() {
        let client = LlmClient::new(&ProviderConfig::default()).unwrap();
        let outcome = client.draft_reply(&series_a_request()).await.unwrap();

        assert!(outcome.prompt.as_str().contains("Excited to announce our Series A!"));
        assert!(outcome.prompt.as_str().contains("1-3 sentences"));
        match outcome.result {
            LlmResult::Success(reply) => {
                assert_eq!(reply.text, MOCK_REPLY);
                assert_eq!(reply.provider, "mock");
            }
            LlmResult::Failure(f) => panic!("mock failed: {:?}", f),
        }
    }

    #[tokio::test]
    async fn test_draft_reply_rejects_invalid_request() {
        let client = LlmClient::new(&ProviderConfig::default()).unwrap();
        let mut request = series_a_request();
        request.context.post_text = "   ".to_string();

        let err = client.draft_reply(&request).await.unwrap_err();
        assert_eq!(err, ValidationError::EmptyPostText);
    }

    #[tokio::test]
    async fn test_dispatch_timeout_surfaces_failure() {
        let prompt = Prompt::new("p".to_string());
        let request_id = Uuid::new_v4();
        let result = dispatch(&SlowProvider, &prompt, Duration::from_millis(20), request_id).await;

        let failure = result.failure().expect("expected timeout");
        assert_eq!(failure.kind, ProviderErrorKind::Timeout);
        assert_eq!(failure.provider, "slow");
        assert_eq!(failure.request_id, request_id);
        assert!(failure.retryable);
    }

    fn client_with_timeout(timeout: Duration, observer: Arc<RecordingObserver>) -> LlmClient {
        LlmClient {
            timeout,
            ..LlmClient::new(&ProviderConfig::default()).unwrap()
        }
        .with_observer(observer)
    }

    #[tokio::test]
    async fn test_configured_timeout_caps_longer_caller_bound() {
        let observer = Arc::new(RecordingObserver::default());
        let client = client_with_timeout(Duration::from_millis(50), observer.clone());

        let started = std::time::Instant::now();
        let result = client
            .observed_call(&SlowProvider, &Prompt::new("p".to_string()), Duration::from_secs(3600))
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        let failure = result.failure().expect("expected timeout");
        assert_eq!(failure.kind, ProviderErrorKind::Timeout);

        match &observer.events()[0] {
            LlmEvent::CallStarted { timeout_ms, .. } => assert_eq!(*timeout_ms, 50),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shorter_caller_bound_wins() {
        let observer = Arc::new(RecordingObserver::default());
        let client = client_with_timeout(Duration::from_secs(30), observer.clone());

        let started = std::time::Instant::now();
        let result = client
            .observed_call(&SlowProvider, &Prompt::new("p".to_string()), Duration::from_millis(20))
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        let failure = result.failure().expect("expected timeout");
        assert_eq!(failure.kind, ProviderErrorKind::Timeout);

        // The failure's request id is the correlation id of the call's events
        let events = observer.events();
        match (&events[0], &events[1]) {
            (
                LlmEvent::CallStarted { correlation_id: a, timeout_ms, .. },
                LlmEvent::CallFailed { correlation_id: b, kind, .. },
            ) => {
                assert_eq!(*timeout_ms, 20);
                assert_eq!(a, b);
                assert_eq!(failure.request_id, *a);
                assert_eq!(*kind, ProviderErrorKind::Timeout);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_caller_bound_passes_through_on_fast_provider() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"model":"claude","content":[{"type":"text","text":"hi"}]}"#)
            .create_async()
            .await;

        let config = ProviderConfig::default()
            .with_anthropic(credentials("a", "claude", &server.url()))
            .with_timeout_secs(5);
        let client = LlmClient::new(&config).unwrap();

        let result = client
            .generate_with_timeout(&Prompt::new("p".to_string()), Duration::from_secs(3600))
            .await;
        assert_eq!(result.text(), Some("hi"));
    }

    #[tokio::test]
    async fn test_provider_faults_become_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#)
            .create_async()
            .await;

        let config = ProviderConfig::default().with_openai(credentials("sk-secret", "gpt-4o", &server.url()));
        let observer = Arc::new(RecordingObserver::default());
        let client = LlmClient::new(&config).unwrap().with_observer(observer.clone());

        let outcome = client.draft_reply(&series_a_request()).await.unwrap();
        let failure = outcome.result.failure().expect("expected failure");
        assert_eq!(failure.kind, ProviderErrorKind::AuthError);
        assert_eq!(failure.user_message(), "generation failed: auth_error");

        let events = observer.events();
        let names: Vec<_> = events.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["prompt_assembled", "llm_call_start", "llm_call_failure"]);

        // Correlation id ties start and finish together
        match (&events[1], &events[2]) {
            (
                LlmEvent::CallStarted { correlation_id: a, .. },
                LlmEvent::CallFailed { correlation_id: b, kind, .. },
            ) => {
                assert_eq!(a, b);
                assert_eq!(*kind, ProviderErrorKind::AuthError);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_events_never_carry_content_or_secrets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"model":"claude","content":[{"type":"text","text":"Huge milestone, congrats!"}]}"#)
            .create_async()
            .await;

        let config = ProviderConfig::default().with_anthropic(credentials("sk-ant-secret", "claude", &server.url()));
        let observer = Arc::new(RecordingObserver::default());
        let client = LlmClient::new(&config).unwrap().with_observer(observer.clone());

        let outcome = client.draft_reply(&series_a_request()).await.unwrap();
        assert!(outcome.result.is_success());

        let serialized = serde_json::to_string(&observer.events()).unwrap();
        assert!(!serialized.contains("sk-ant-secret"));
        assert!(!serialized.contains("Series A"));
        assert!(!serialized.contains("Huge milestone"));
        assert!(serialized.contains("\"event\":\"llm_call_success\""));
    }

    #[tokio::test]
    async fn test_concurrent_generate_calls() {
        let client = LlmClient::new(&ProviderConfig::default()).unwrap();
        let prompt = Prompt::new("p".to_string());

        let (a, b, c) = tokio::join!(
            client.generate(&prompt),
            client.generate(&prompt),
            client.generate(&prompt)
        );
        for result in [a, b, c] {
            assert_eq!(result.text(), Some(MOCK_REPLY));
        }
    }
}

//! Provider adapters.
//!
//! Each adapter turns one completion call into an [`LlmResult`]. Adapters never
//! return errors or panic on provider faults: HTTP statuses, transport errors
//! and undecodable bodies all become [`LlmFailure`] values.

pub mod anthropic;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use crate::llm::config::{ProviderConfig, ProviderKind};
use crate::llm::prompts::Prompt;
use crate::llm::result::{LlmFailure, LlmResult, ProviderErrorKind};
use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

/// Anything that can turn a prompt into a normalised result
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stable provider name reported in results
    fn name(&self) -> &'static str;

    /// Make exactly one completion call
    async fn complete(&self, prompt: &Prompt) -> LlmResult;
}

/// The closed set of providers a client can be built with
#[derive(Debug, Clone)]
pub enum Provider {
    Anthropic(AnthropicProvider),
    OpenAi(OpenAiProvider),
    Mock(MockProvider),
}

impl Provider {
    /// Pick the first configured provider: primary, then secondary, then mock
    pub fn select(config: &ProviderConfig, http: &reqwest::Client) -> Self {
        if let Some(credentials) = &config.anthropic {
            return Provider::Anthropic(AnthropicProvider::new(http.clone(), credentials, config.max_tokens));
        }
        if let Some(credentials) = &config.openai {
            return Provider::OpenAi(OpenAiProvider::new(http.clone(), credentials, config.max_tokens));
        }
        Provider::Mock(MockProvider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Anthropic(_) => ProviderKind::Anthropic,
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Mock(_) => ProviderKind::Mock,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::Anthropic(p) => p.model(),
            Provider::OpenAi(p) => p.model(),
            Provider::Mock(_) => mock::MOCK_MODEL_ID,
        }
    }
}

#[async_trait]
impl CompletionProvider for Provider {
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    async fn complete(&self, prompt: &Prompt) -> LlmResult {
        match self {
            Provider::Anthropic(p) => p.complete(prompt).await,
            Provider::OpenAi(p) => p.complete(prompt).await,
            Provider::Mock(p) => p.complete(prompt).await,
        }
    }
}

/// Map a non-success HTTP status to a failure
pub(crate) fn status_failure(label: &str, provider: &str, status: StatusCode, request_id: Uuid) -> LlmFailure {
    let code = status.as_u16();
    match code {
        401 | 403 => LlmFailure::new(
            ProviderErrorKind::AuthError,
            provider,
            format!("{} API key is invalid or expired (HTTP {}).", label, code),
            request_id,
        ),
        429 => LlmFailure::new(
            ProviderErrorKind::RateLimited,
            provider,
            format!("{} rate limit reached. Please wait and retry.", label),
            request_id,
        ),
        408 | 504 => LlmFailure::new(
            ProviderErrorKind::Timeout,
            provider,
            format!("Request to {} timed out (HTTP {}).", label, code),
            request_id,
        ),
        c if c >= 500 => LlmFailure::new(
            ProviderErrorKind::ProviderUnavailable,
            provider,
            format!("{} is unavailable (HTTP {}).", label, code),
            request_id,
        ),
        _ => LlmFailure::new(
            ProviderErrorKind::ProviderUnavailable,
            provider,
            format!("{} API error (HTTP {}).", label, code),
            request_id,
        )
        .with_retryable(false),
    }
}

/// Map a transport-level error to a failure
pub(crate) fn transport_failure(label: &str, provider: &str, err: &reqwest::Error, request_id: Uuid) -> LlmFailure {
    if err.is_timeout() {
        LlmFailure::new(
            ProviderErrorKind::Timeout,
            provider,
            format!("Request to {} timed out.", label),
            request_id,
        )
    } else if err.is_decode() {
        LlmFailure::new(
            ProviderErrorKind::MalformedResponse,
            provider,
            format!("Failed to read {} response.", label),
            request_id,
        )
    } else if err.is_connect() {
        LlmFailure::new(
            ProviderErrorKind::ProviderUnavailable,
            provider,
            format!("Could not connect to {} API.", label),
            request_id,
        )
    } else {
        LlmFailure::new(
            ProviderErrorKind::ProviderUnavailable,
            provider,
            format!("Request to {} failed.", label),
            request_id,
        )
    }
}

pub(crate) fn malformed(provider: &str, message: impl Into<String>, request_id: Uuid) -> LlmFailure {
    LlmFailure::new(ProviderErrorKind::MalformedResponse, provider, message, request_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::config::{ApiKey, ProviderCredentials};

    fn credentials(key: &str, model: &str) -> ProviderCredentials {
        ProviderCredentials::new(ApiKey::new(key).unwrap(), model)
    }

    #[test]
    fn test_select_primary_when_both_present() {
        let config = ProviderConfig::default()
            .with_anthropic(credentials("a", "claude"))
            .with_openai(credentials("o", "gpt-4o"));
        let provider = Provider::select(&config, &reqwest::Client::new());
        assert_eq!(provider.kind(), ProviderKind::Anthropic);
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.model(), "claude");
    }

    #[test]
    fn test_select_secondary_when_only_secondary() {
        let config = ProviderConfig::default().with_openai(credentials("o", "gpt-4o"));
        let provider = Provider::select(&config, &reqwest::Client::new());
        assert_eq!(provider.kind(), ProviderKind::OpenAi);
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_select_mock_without_credentials() {
        let provider = Provider::select(&ProviderConfig::default(), &reqwest::Client::new());
        assert_eq!(provider.kind(), ProviderKind::Mock);
        assert_eq!(provider.model(), "mock-v1");
    }

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        let cases = [
            (401, ProviderErrorKind::AuthError, false),
            (403, ProviderErrorKind::AuthError, false),
            (429, ProviderErrorKind::RateLimited, true),
            (408, ProviderErrorKind::Timeout, true),
            (504, ProviderErrorKind::Timeout, true),
            (500, ProviderErrorKind::ProviderUnavailable, true),
            (503, ProviderErrorKind::ProviderUnavailable, true),
            (529, ProviderErrorKind::ProviderUnavailable, true),
            (400, ProviderErrorKind::ProviderUnavailable, false),
            (404, ProviderErrorKind::ProviderUnavailable, false),
        ];

        for (code, kind, retryable) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            let failure = status_failure("OpenAI", "openai", status, id);
            assert_eq!(failure.kind, kind, "HTTP {}", code);
            assert_eq!(failure.retryable, retryable, "HTTP {}", code);
            assert_eq!(failure.provider, "openai");
            assert_eq!(failure.request_id, id);
        }
    }
}

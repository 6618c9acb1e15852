use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Normalised provider failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Missing, invalid or revoked credential
    AuthError,
    /// Provider backpressure (HTTP 429)
    RateLimited,
    /// The configured or caller-imposed bound elapsed
    Timeout,
    /// Network failure or 5xx-class response
    ProviderUnavailable,
    /// Response could not be turned into reply text
    MalformedResponse,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::AuthError => "auth_error",
            ProviderErrorKind::RateLimited => "rate_limited",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::ProviderUnavailable => "provider_unavailable",
            ProviderErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmReply {
    pub text: String,
    pub provider: String,
    pub model_id: Option<String>,
    pub request_id: Uuid,
    pub latency_ms: u64,
}

/// Failed generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmFailure {
    pub kind: ProviderErrorKind,

    /// Human-readable description, free of credentials and post content
    pub message: String,

    pub provider: String,

    /// Whether a later attempt may succeed. Retrying is the caller's decision.
    pub retryable: bool,

    pub request_id: Uuid,
}

impl LlmFailure {
    pub fn new(kind: ProviderErrorKind, provider: &str, message: impl Into<String>, request_id: Uuid) -> Self {
        let retryable = matches!(
            kind,
            ProviderErrorKind::RateLimited | ProviderErrorKind::Timeout | ProviderErrorKind::ProviderUnavailable
        );
        Self {
            kind,
            message: message.into(),
            provider: provider.to_string(),
            retryable,
            request_id,
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Message safe to show to an end user
    pub fn user_message(&self) -> String {
        format!("generation failed: {}", self.kind)
    }
}

/// Outcome of a single `generate` call: exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LlmResult {
    Success(LlmReply),
    #[serde(rename = "error")]
    Failure(LlmFailure),
}

impl LlmResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LlmResult::Success(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            LlmResult::Success(reply) => Some(&reply.text),
            LlmResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&LlmFailure> {
        match self {
            LlmResult::Success(_) => None,
            LlmResult::Failure(failure) => Some(failure),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            LlmResult::Success(reply) => &reply.provider,
            LlmResult::Failure(failure) => &failure.provider,
        }
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            LlmResult::Success(reply) => reply.request_id,
            LlmResult::Failure(failure) => failure.request_id,
        }
    }
}

impl From<LlmReply> for LlmResult {
    fn from(reply: LlmReply) -> Self {
        LlmResult::Success(reply)
    }
}

impl From<LlmFailure> for LlmResult {
    fn from(failure: LlmFailure) -> Self {
        LlmResult::Failure(failure)
    }
}

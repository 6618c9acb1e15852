//! OpenAI Chat Completions adapter
//!
//! Request and response bodies use the `async-openai` wire types. The call
//! itself goes through the shared `reqwest` client so the HTTP status is
//! visible and no client-side retry happens.

use crate::llm::config::{ApiKey, ProviderCredentials};
use crate::llm::prompts::Prompt;
use crate::llm::providers::{malformed, status_failure, transport_failure, CompletionProvider};
use crate::llm::result::{LlmFailure, LlmReply, LlmResult, ProviderErrorKind};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use uuid::Uuid;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const NAME: &str = "openai";
const LABEL: &str = "OpenAI";

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: Client,
    api_key: ApiKey,
    model: String,
    api_base: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(http: Client, credentials: &ProviderCredentials, max_tokens: u32) -> Self {
        Self {
            http,
            api_key: credentials.api_key.clone(),
            model: credentials.model.clone(),
            api_base: credentials
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    fn build_request(&self, prompt: &Prompt) -> Result<CreateChatCompletionRequest, String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.as_str())
            .build()
            .map(ChatCompletionRequestMessage::User)
            .map_err(|e| e.to_string())?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &Prompt) -> LlmResult {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let request = match self.build_request(prompt) {
            Ok(request) => request,
            Err(_) => {
                return LlmFailure::new(
                    ProviderErrorKind::ProviderUnavailable,
                    NAME,
                    "Could not build OpenAI request.",
                    request_id,
                )
                .with_retryable(false)
                .into()
            }
        };

        let response = match self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_failure(LABEL, NAME, &e, request_id).into(),
        };

        let status = response.status();
        if !status.is_success() {
            return status_failure(LABEL, NAME, status, request_id).into();
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return transport_failure(LABEL, NAME, &e, request_id).into(),
        };

        let parsed: CreateChatCompletionResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(_) => return malformed(NAME, "Failed to parse OpenAI response.", request_id).into(),
        };

        let text = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        if text.is_empty() {
            return malformed(NAME, "No reply generated: model returned empty text.", request_id).into();
        }

        LlmReply {
            text,
            provider: NAME.to_string(),
            model_id: Some(parsed.model),
            request_id,
            latency_ms: start.elapsed().as_millis() as u64,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> OpenAiProvider {
        let credentials = ProviderCredentials::new(ApiKey::new("sk-test").unwrap(), "gpt-4o")
            .with_api_base(base);
        OpenAiProvider::new(Client::new(), &credentials, 256)
    }

    fn prompt() -> Prompt {
        Prompt::new("Write a reply".to_string())
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content, "refusal": null},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        })
        .to_string()
    }

    #[test]
    fn test_request_body_shape() {
        let request = provider("http://unused").build_request(&prompt()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Write a reply");
        assert_eq!(json["max_completion_tokens"], 256);
    }

    #[tokio::test]
    async fn test_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Well deserved, congrats!"))
            .create_async()
            .await;

        let result = provider(&server.url()).complete(&prompt()).await;
        mock.assert_async().await;

        match result {
            LlmResult::Success(reply) => {
                assert_eq!(reply.text, "Well deserved, congrats!");
                assert_eq!(reply.provider, "openai");
                assert_eq!(reply.model_id.as_deref(), Some("gpt-4o-2024-08-06"));
            }
            LlmResult::Failure(f) => panic!("unexpected failure: {:?}", f),
        }
    }

    async fn failure_for(status: usize, body: String) -> LlmFailure {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(status)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;

        let result = provider(&server.url()).complete(&prompt()).await;
        // A single request even for retryable statuses
        mock.assert_async().await;
        result.failure().cloned().expect("expected failure")
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#;
        let failure = failure_for(401, body.to_string()).await;
        assert_eq!(failure.kind, ProviderErrorKind::AuthError);
        assert!(!failure.message.contains("sk-test"));
    }

    #[tokio::test]
    async fn test_rate_limited_is_not_retried() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests","param":null,"code":"rate_limit_exceeded"}}"#;
        let failure = failure_for(429, body.to_string()).await;
        assert_eq!(failure.kind, ProviderErrorKind::RateLimited);
        assert!(failure.retryable);
    }

    #[tokio::test]
    async fn test_server_error() {
        let failure = failure_for(502, "bad gateway".to_string()).await;
        assert_eq!(failure.kind, ProviderErrorKind::ProviderUnavailable);
        assert!(failure.retryable);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let failure = failure_for(200, r#"{"unexpected": true}"#.to_string()).await;
        assert_eq!(failure.kind, ProviderErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_empty_choice_is_malformed() {
        let failure = failure_for(200, completion_body("")).await;
        assert_eq!(failure.kind, ProviderErrorKind::MalformedResponse);
        assert!(failure.message.contains("empty"));
    }
}

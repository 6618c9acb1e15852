//! Anthropic Messages API adapter

use crate::llm::config::{ApiKey, ProviderCredentials};
use crate::llm::prompts::Prompt;
use crate::llm::providers::{malformed, status_failure, transport_failure, CompletionProvider};
use crate::llm::result::{LlmReply, LlmResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const NAME: &str = "anthropic";
const LABEL: &str = "Anthropic";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    http: Client,
    api_key: ApiKey,
    model: String,
    api_base: String,
    max_tokens: u32,
}

impl AnthropicProvider {
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
        format!("{}/v1/messages", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &Prompt) -> LlmResult {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        let response = match self
            .http
            .post(self.endpoint())
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .json(&body)
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

        let parsed: MessagesResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(_) => return malformed(NAME, "Failed to parse Anthropic response.", request_id).into(),
        };

        let text = parsed
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        if text.is_empty() {
            return malformed(NAME, "No reply generated: model returned empty text.", request_id).into();
        }

        LlmReply {
            text,
            provider: NAME.to_string(),
            model_id: parsed.model.or_else(|| Some(self.model.clone())),
            request_id,
            latency_ms: start.elapsed().as_millis() as u64,
        }
        .into()
    }
}

use crate::llm::prompts::Prompt;
use crate::llm::providers::CompletionProvider;
use crate::llm::result::{LlmReply, LlmResult};
use async_trait::async_trait;
use uuid::Uuid;

/// Canned reply returned for every prompt
pub const MOCK_REPLY: &str = "This is a mock reply for testing purposes.";

pub const MOCK_MODEL_ID: &str = "mock-v1";

/// Offline provider used when no credential is configured
///
/// Never touches the network and always succeeds with [`MOCK_REPLY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl MockProvider {
    /// Synchronous form of [`CompletionProvider::complete`]
    pub fn reply(&self, _prompt: &Prompt) -> LlmResult {
        LlmResult::Success(LlmReply {
            text: MOCK_REPLY.to_string(),
            provider: self.name().to_string(),
            model_id: Some(MOCK_MODEL_ID.to_string()),
            request_id: Uuid::new_v4(),
            latency_ms: 0,
        })
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &Prompt) -> LlmResult {
        self.reply(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ignores_prompt_content() {
        let a = MockProvider.complete(&Prompt::new("first".to_string())).await;
        let b = MockProvider.complete(&Prompt::new("something else entirely".to_string())).await;

        assert_eq!(a.text(), Some(MOCK_REPLY));
        assert_eq!(b.text(), Some(MOCK_REPLY));
        assert_eq!(a.provider(), "mock");
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_sync_reply() {
        match MockProvider.reply(&Prompt::new("x".to_string())) {
            LlmResult::Success(reply) => {
                assert_eq!(reply.model_id.as_deref(), Some(MOCK_MODEL_ID));
                assert_eq!(reply.latency_ms, 0);
            }
            LlmResult::Failure(f) => panic!("mock failed: {:?}", f),
        }
    }
}

pub mod config;
pub mod observer;
pub mod prompts;
pub mod providers;
pub mod result;
pub mod service;

pub use config::{ApiKey, ProviderConfig, ProviderCredentials, ProviderKind};
pub use observer::{LlmEvent, LlmObserver, NoopObserver};
pub use prompts::{build_prompt, Prompt, PromptMetadata};
pub use result::{LlmFailure, LlmReply, LlmResult, ProviderErrorKind};
pub use service::{DraftOutcome, LlmClient, LlmClientError};

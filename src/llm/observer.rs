//! Hooks for watching prompt assembly and provider calls.
//!
//! The client reports what happens through an injected [`LlmObserver`] rather
//! than writing logs itself. Events carry identifiers, lengths, provider names
//! and error kinds only; prompt text, post content and credentials never
//! appear in them.

use crate::llm::prompts::PromptMetadata;
use crate::llm::result::ProviderErrorKind;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LlmEvent {
    PromptAssembled {
        preset_label: Option<String>,
        prompt_length: usize,
        post_length: usize,
        truncation_applied: bool,
        refine: bool,
        warning_count: usize,
    },
    #[serde(rename = "llm_call_start")]
    CallStarted {
        correlation_id: Uuid,
        provider: String,
        model: String,
        prompt_length: usize,
        timeout_ms: u64,
    },
    #[serde(rename = "llm_call_success")]
    CallSucceeded {
        correlation_id: Uuid,
        provider: String,
        model_id: Option<String>,
        latency_ms: u64,
        reply_length: usize,
    },
    #[serde(rename = "llm_call_failure")]
    CallFailed {
        correlation_id: Uuid,
        provider: String,
        kind: ProviderErrorKind,
        retryable: bool,
    },
}

impl LlmEvent {
    /// Canonical event name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            LlmEvent::PromptAssembled { .. } => "prompt_assembled",
            LlmEvent::CallStarted { .. } => "llm_call_start",
            LlmEvent::CallSucceeded { .. } => "llm_call_success",
            LlmEvent::CallFailed { .. } => "llm_call_failure",
        }
    }

    pub fn prompt_assembled(metadata: &PromptMetadata) -> Self {
        LlmEvent::PromptAssembled {
            preset_label: metadata.preset_label.clone(),
            prompt_length: metadata.prompt_length,
            post_length: metadata.post_length,
            truncation_applied: metadata.truncation_applied,
            refine: metadata.refine,
            warning_count: metadata.warnings.len(),
        }
    }
}

/// Receiver for client events
pub trait LlmObserver: Send + Sync {
    fn on_event(&self, event: &LlmEvent);
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LlmObserver for NoopObserver {
    fn on_event(&self, _event: &LlmEvent) {}
}

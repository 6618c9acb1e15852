use crate::llm::{LlmEvent, LlmObserver};
use tracing::{debug, info, warn};

/// Forwards client events to `tracing` as structured fields
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LlmObserver for TracingObserver {
    fn on_event(&self, event: &LlmEvent) {
        let name = event.name();
        match event {
            LlmEvent::PromptAssembled {
                preset_label,
                prompt_length,
                post_length,
                truncation_applied,
                refine,
                warning_count,
            } => debug!(
                event = name,
                preset = preset_label.as_deref().unwrap_or("custom"),
                prompt_length,
                post_length,
                truncation_applied,
                refine,
                warning_count,
                "Prompt assembled"
            ),
            LlmEvent::CallStarted {
                correlation_id,
                provider,
                model,
                prompt_length,
                timeout_ms,
            } => info!(
                event = name,
                %correlation_id,
                provider = provider.as_str(),
                model = model.as_str(),
                prompt_length,
                timeout_ms,
                "Calling LLM provider"
            ),
            LlmEvent::CallSucceeded {
                correlation_id,
                provider,
                model_id,
                latency_ms,
                reply_length,
            } => info!(
                event = name,
                %correlation_id,
                provider = provider.as_str(),
                model_id = model_id.as_deref().unwrap_or("unknown"),
                latency_ms,
                reply_length,
                "LLM call succeeded"
            ),
            LlmEvent::CallFailed {
                correlation_id,
                provider,
                kind,
                retryable,
            } => warn!(
                event = name,
                %correlation_id,
                provider = provider.as_str(),
                kind = kind.as_str(),
                retryable,
                "LLM call failed"
            ),
        }
    }
}

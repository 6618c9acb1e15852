use crate::llm::{DraftOutcome, LlmResult, PromptMetadata};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

const TERMINAL_WIDTH: usize = 60;
const SEPARATOR_WIDTH: usize = 40;

/// Spinner shown on stderr while waiting on the provider
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// JSON view of a draft; the prompt is included only on request
#[derive(Debug, Serialize)]
pub struct DraftView<'a> {
    pub result: &'a LlmResult,
    pub metadata: &'a PromptMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
}

impl<'a> DraftView<'a> {
    pub fn new(outcome: &'a DraftOutcome, show_prompt: bool) -> Self {
        Self {
            result: &outcome.result,
            metadata: &outcome.metadata,
            prompt: show_prompt.then(|| outcome.prompt.as_str()),
        }
    }
}

/// Console printer for drafts and prompts
pub struct DraftPrinter {
    verbose: bool,
    show_prompt: bool,
}

impl Default for DraftPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftPrinter {
    pub fn new() -> Self {
        Self {
            verbose: false,
            show_prompt: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_prompt(mut self, show_prompt: bool) -> Self {
        self.show_prompt = show_prompt;
        self
    }

    pub fn print_draft(&self, outcome: &DraftOutcome) {
        self.print_warnings(&outcome.metadata.warnings);

        if self.show_prompt {
            self.print_prompt(outcome.prompt.as_str());
        }

        match &outcome.result {
            LlmResult::Success(reply) => {
                println!("\n{}", "✍️  Draft Reply".bright_white().bold());
                println!("{}", "─".repeat(SEPARATOR_WIDTH).bright_black());
                println!("{}", reply.text);
                println!("{}", "─".repeat(SEPARATOR_WIDTH).bright_black());
                println!(
                    "  Provider: {}  Model: {}  Latency: {} ms",
                    reply.provider.bright_cyan(),
                    reply.model_id.as_deref().unwrap_or("unknown").bright_cyan(),
                    reply.latency_ms
                );
                if self.verbose {
                    self.print_metadata(&outcome.metadata, reply.request_id);
                }
            }
            LlmResult::Failure(failure) => {
                eprintln!("{} {}", "❌".red(), failure.user_message().red().bold());
                if self.verbose {
                    eprintln!("  Provider:  {}", failure.provider);
                    eprintln!("  Detail:    {}", failure.message);
                    eprintln!("  Retryable: {}", failure.retryable);
                    eprintln!("  Request:   {}", failure.request_id);
                }
            }
        }
    }

    pub fn print_prompt(&self, prompt: &str) {
        println!("\n{}", "═".repeat(TERMINAL_WIDTH).bright_blue());
        println!("{}", "PROMPT".bright_white().bold());
        println!("{}", "═".repeat(TERMINAL_WIDTH).bright_blue());
        println!("{}", prompt);
        println!("{}", "═".repeat(TERMINAL_WIDTH).bright_blue());
    }

    pub fn print_metadata(&self, metadata: &PromptMetadata, request_id: Uuid) {
        println!("\n{}", "📋 Prompt Details".bright_white().bold());
        println!(
            "  Preset:          {}",
            metadata.preset_label.as_deref().unwrap_or("custom")
        );
        println!("  Prompt length:   {}", metadata.prompt_length);
        println!("  Post length:     {}", metadata.post_length);
        println!("  Revision:        {}", metadata.refine);
        if metadata.truncation_applied {
            println!(
                "  Article:         {} (truncated from {} chars)",
                "truncated".yellow(),
                metadata.original_article_length.unwrap_or_default()
            );
        }
        println!("  Request ID:      {}", request_id);
    }

    pub fn print_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            eprintln!("{} {}", "⚠️ ".yellow(), warning.yellow());
        }
    }
}

use crate::cli::commands::{OutputFormat, RequestArgs};
use crate::cli::output::DraftPrinter;
use crate::cli::utils::load_prompt_input;
use crate::llm::{build_prompt, Prompt, PromptMetadata};
use crate::reply::PromptRequest;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PromptView<'a> {
    prompt: &'a Prompt,
    metadata: &'a PromptMetadata,
}

/// Render the prompt for a request without contacting any provider
pub fn handle_prompt_command(args: RequestArgs, format: OutputFormat) -> Result<()> {
    let request = PromptRequest::try_from(load_prompt_input(&args)?)?;
    let (prompt, metadata) = build_prompt(&request)?;

    match format {
        OutputFormat::Text => {
            let printer = DraftPrinter::new();
            printer.print_warnings(&metadata.warnings);
            printer.print_prompt(prompt.as_str());
            println!(
                "  {} chars, preset: {}{}",
                metadata.prompt_length,
                metadata.preset_label.as_deref().unwrap_or("custom"),
                if metadata.truncation_applied {
                    ", article truncated"
                } else {
                    ""
                }
            );
        }
        OutputFormat::Json => {
            let view = PromptView {
                prompt: &prompt,
                metadata: &metadata,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

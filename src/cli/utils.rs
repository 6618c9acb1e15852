use crate::cli::commands::{LogFormat, RequestArgs};
use crate::reply::PromptInput;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// Logs go to stderr so that stdout carries only the draft or prompt.
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_logging(verbose: bool, log_format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = match log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

pub fn print_info() {
    println!("ReplyPilot v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("For more information, visit: {}", env!("CARGO_PKG_REPOSITORY"));
}

/// Build a [`PromptInput`] from an optional request file plus command-line overrides
pub fn load_prompt_input(args: &RequestArgs) -> Result<PromptInput> {
    let mut input = match &args.input {
        Some(path) => read_input_file(path)?,
        None => PromptInput::default(),
    };

    if let Some(text) = &args.post_text {
        input.post_text = if text == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read post text from stdin")?;
            buffer
        } else {
            text.clone()
        };
    }

    if let Some(path) = &args.article_file {
        let article = fs::read_to_string(path)
            .with_context(|| format!("Failed to read article file {}", path.display()))?;
        input.article_text = Some(article);
    }

    overlay(&mut input.author_name, &args.author);
    overlay(&mut input.author_profile_url, &args.author_profile_url);
    overlay(&mut input.post_url, &args.post_url);
    overlay(&mut input.image_ref, &args.image_ref);
    overlay(&mut input.preset_id, &args.preset);
    overlay(&mut input.tone, &args.tone);
    overlay(&mut input.length, &args.length);
    overlay(&mut input.intent, &args.intent);
    overlay(&mut input.prior_reply, &args.prior_reply);
    overlay(&mut input.instruction, &args.instruction);

    if !args.tags.is_empty() {
        input.tags = args.tags.clone();
    }
    if args.allow_hashtags {
        input.allow_hashtags = Some(true);
    }

    Ok(input)
}

fn read_input_file(path: &Path) -> Result<PromptInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let input = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    };

    debug!("Loaded request from {}", path.display());
    Ok(input)
}

fn overlay(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

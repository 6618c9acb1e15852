use crate::llm::config::{ProviderConfig, ProviderCredentials};
use crate::llm::ProviderKind;
use anyhow::Result;
use std::env;

pub fn handle_config_command() -> Result<()> {
    // Load .env file if it exists
    let env_file_loaded = dotenv::dotenv().is_ok();
    let config = ProviderConfig::from_env();
    let summary = config.summary();

    println!("🔧 ReplyPilot Configuration");
    println!("═══════════════════════════════════════");
    println!();

    println!("📦 Version Information:");
    println!("  • ReplyPilot: v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("🌍 Environment Configuration:");
    if env_file_loaded {
        println!("  • .env file: ✅ Loaded");
    } else {
        println!("  • .env file: ⚠️  Not found (using system environment)");
    }
    match env::var("RUST_LOG") {
        Ok(val) => println!("  • RUST_LOG: {}", val),
        Err(_) => println!("  • RUST_LOG: info (default)"),
    }
    println!();

    println!("🤖 LLM Providers:");
    print_provider("ANTHROPIC_API_KEY", config.anthropic.as_ref());
    print_provider("OPENAI_API_KEY", config.openai.as_ref());
    println!("  • LLM_TIMEOUT_SECONDS: {}", summary.timeout_secs);
    println!("  • LLM_MAX_TOKENS: {}", summary.max_tokens);
    println!();

    match summary.selected_provider {
        ProviderKind::Mock => {
            println!("  ➜ Selected provider: mock (no API key configured)");
        }
        selected => println!("  ➜ Selected provider: {}", selected),
    }
    println!();

    println!("💡 Tips:");
    println!("  • Anthropic is used when ANTHROPIC_API_KEY is set, otherwise OpenAI");
    println!("  • Override models with ANTHROPIC_MODEL or OPENAI_MODEL");
    println!("  • Use --verbose or RUST_LOG=debug for per-call diagnostics");

    Ok(())
}

fn print_provider(key_var: &str, credentials: Option<&ProviderCredentials>) {
    match credentials {
        Some(credentials) => {
            println!("  • {}: ✅ Set (hidden)", key_var);
            println!("      model: {}", credentials.model);
            if let Some(base) = &credentials.api_base {
                println!("      api base: {}", base);
            }
        }
        None => println!("  • {}: ❌ Not set", key_var),
    }
}

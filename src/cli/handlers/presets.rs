use crate::cli::commands::OutputFormat;
use crate::reply::catalog;
use anyhow::Result;
use colored::Colorize;

pub fn handle_presets_command(detailed: bool, format: OutputFormat) -> Result<()> {
    let presets = catalog::all();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(presets)?);
        return Ok(());
    }

    println!("{}", "📚 Reply Presets".bright_white().bold());
    println!("═══════════════════════════════════════");

    for named in presets {
        let preset = &named.preset;
        println!();
        println!("  {} {}", named.id.bright_cyan(), format!("({})", named.label).bright_black());
        println!(
            "    tone: {}  length: {}  intent: {}",
            preset.tone, preset.length, preset.intent
        );

        if detailed {
            for bullet in &preset.guidance {
                println!("    • {}", bullet);
            }
        }
    }

    println!();
    println!("💡 Use --preset <id>, then --tone/--length/--intent to override single fields.");
    Ok(())
}

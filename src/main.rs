use clap::Parser;
use replypilot::cli::commands::{Cli, Commands};
use replypilot::cli::handlers::{
    handle_config_command, handle_draft_command, handle_presets_command, handle_prompt_command,
};
use replypilot::cli::utils::{init_logging, print_info};
use replypilot::reply::ValidationError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.log_format) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    // Execute command
    let outcome = match cli.command {
        Commands::Draft(args) => handle_draft_command(args, cli.verbose).await,

        Commands::Prompt { request, format } => {
            handle_prompt_command(request, format).map(|_| ExitCode::SUCCESS)
        }

        Commands::Presets { detailed, format } => {
            handle_presets_command(detailed, format).map(|_| ExitCode::SUCCESS)
        }

        Commands::Config => handle_config_command().map(|_| ExitCode::SUCCESS),

        Commands::Info => {
            print_info();
            Ok(ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<ValidationError>() {
            Some(validation) => {
                eprintln!("Invalid request: {}", validation);
                ExitCode::from(2)
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

use crate::cli::commands::{DraftArgs, OutputFormat};
use crate::cli::output::{spinner, DraftPrinter, DraftView};
use crate::cli::telemetry::TracingObserver;
use crate::cli::utils::load_prompt_input;
use crate::llm::{LlmClient, ProviderConfig, ProviderKind};
use crate::reply::PromptRequest;
use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn handle_draft_command(args: DraftArgs, verbose: bool) -> Result<ExitCode> {
    draft_with_config(args, ProviderConfig::from_env(), verbose).await
}

async fn draft_with_config(args: DraftArgs, mut config: ProviderConfig, verbose: bool) -> Result<ExitCode> {
    let request = PromptRequest::try_from(load_prompt_input(&args.request)?)?;

    if let Some(secs) = args.timeout {
        // A CLI bound can tighten the configured timeout, never extend it
        let bound = secs.min(config.timeout_secs);
        config = config.with_timeout_secs(bound);
    }

    let client = LlmClient::new(&config)?.with_observer(Arc::new(TracingObserver));
    if client.provider_kind() == ProviderKind::Mock {
        warn!("No LLM API key configured; using the mock provider");
        warn!("Set ANTHROPIC_API_KEY or OPENAI_API_KEY to generate real drafts");
    } else {
        info!(
            "Drafting with {} ({})",
            client.provider_name(),
            client.model()
        );
    }

    let outcome = match args.format {
        OutputFormat::Text => {
            let progress = spinner(&format!("Waiting for {}...", client.provider_name()));
            let outcome = client.draft_reply(&request).await;
            progress.finish_and_clear();
            outcome?
        }
        OutputFormat::Json => client.draft_reply(&request).await?,
    };

    match args.format {
        OutputFormat::Text => DraftPrinter::new()
            .with_verbose(verbose)
            .with_prompt(args.show_prompt)
            .print_draft(&outcome),
        OutputFormat::Json => {
            let view = DraftView::new(&outcome, args.show_prompt);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    if outcome.result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::RequestArgs;
    use crate::llm::{ApiKey, ProviderCredentials};
    use crate::reply::ValidationError;

    fn draft_args(request: RequestArgs) -> DraftArgs {
        DraftArgs {
            request,
            format: OutputFormat::Json,
            timeout: Some(5),
            show_prompt: false,
        }
    }

    #[tokio::test]
    async fn test_draft_with_mock_provider_succeeds() {
        let args = draft_args(RequestArgs {
            post_text: Some("Excited to announce our Series A!".to_string()),
            preset: Some("enthusiastic_short_congratulate".to_string()),
            ..Default::default()
        });

        let code = draft_with_config(args, ProviderConfig::default(), false).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_draft_reports_provider_failure_exit_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .create_async()
            .await;

        let config = ProviderConfig::default().with_anthropic(
            ProviderCredentials::new(ApiKey::new("k").unwrap(), "claude")
                .with_api_base(server.url()),
        );
        let args = draft_args(RequestArgs {
            post_text: Some("We just shipped v2.".to_string()),
            preset: Some("casual_medium_add".to_string()),
            ..Default::default()
        });

        let code = draft_with_config(args, config, false).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn test_draft_rejects_empty_post() {
        let args = draft_args(RequestArgs {
            post_text: Some("   ".to_string()),
            preset: Some("prof_short_agree".to_string()),
            ..Default::default()
        });

        let err = draft_with_config(args, ProviderConfig::default(), false)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyPostText)
        );
    }
}

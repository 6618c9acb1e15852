use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "replypilot",
    about = "Draft LinkedIn replies with an LLM",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a prompt for a post and generate a reply draft
    Draft(DraftArgs),

    /// Render the prompt for a post without calling any provider
    Prompt {
        #[command(flatten)]
        request: RequestArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the built-in reply presets
    Presets {
        /// Show guidance bullets for each preset
        #[arg(long)]
        detailed: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Display the resolved provider configuration (secrets hidden)
    Config,

    /// Show information about ReplyPilot
    Info,
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Provider request timeout in seconds (cannot exceed LLM_TIMEOUT_SECONDS)
    #[arg(long, env = "REPLYPILOT_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Also print the prompt that was sent
    #[arg(long)]
    pub show_prompt: bool,
}

/// Post context and preset selection shared by `draft` and `prompt`
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// JSON or YAML file holding the request; flags override its fields
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Text of the post being replied to ("-" reads stdin)
    #[arg(long)]
    pub post_text: Option<String>,

    /// Post author's display name
    #[arg(long)]
    pub author: Option<String>,

    /// Topic or industry tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Author profile URL
    #[arg(long)]
    pub author_profile_url: Option<String>,

    /// URL of the post
    #[arg(long)]
    pub post_url: Option<String>,

    /// File containing the text of an article linked from the post
    #[arg(long, value_name = "FILE")]
    pub article_file: Option<PathBuf>,

    /// Description of an image attached to the post
    #[arg(long)]
    pub image_ref: Option<String>,

    /// Built-in preset id (see `replypilot presets`)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Tone (professional, casual, enthusiastic, concise, supportive, contrarian)
    #[arg(long)]
    pub tone: Option<String>,

    /// Length (short, medium, long)
    #[arg(long)]
    pub length: Option<String>,

    /// Intent (agree, add-value, ask-question, congratulate, encourage, challenge, other)
    #[arg(long)]
    pub intent: Option<String>,

    /// Allow hashtags in the reply
    #[arg(long)]
    pub allow_hashtags: bool,

    /// Previous draft to revise
    #[arg(long)]
    pub prior_reply: Option<String>,

    /// How the previous draft should change
    #[arg(long, requires = "prior_reply")]
    pub instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_draft_with_flags() {
        let cli = Cli::parse_from([
            "replypilot",
            "draft",
            "--post-text",
            "Excited to announce our Series A!",
            "--tone",
            "enthusiastic",
            "--length",
            "short",
            "--intent",
            "congratulate",
            "--tag",
            "startups",
            "--tag",
            "funding",
            "--format",
            "json",
        ]);

        match cli.command {
            Commands::Draft(args) => {
                assert_eq!(args.request.post_text.as_deref(), Some("Excited to announce our Series A!"));
                assert_eq!(args.request.tags, vec!["startups", "funding"]);
                assert_eq!(args.format, OutputFormat::Json);
                assert!(!args.show_prompt);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_timeout_must_be_positive() {
        let base = ["replypilot", "draft", "--post-text", "x", "--preset", "prof_short_agree"];

        let zero = Cli::try_parse_from(base.iter().copied().chain(["--timeout", "0"]));
        assert!(zero.is_err());

        let cli = Cli::parse_from(base.iter().copied().chain(["--timeout", "10"]));
        match cli.command {
            Commands::Draft(args) => assert_eq!(args.timeout, Some(10)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_instruction_requires_prior_reply() {
        let result = Cli::try_parse_from([
            "replypilot",
            "prompt",
            "--post-text",
            "x",
            "--instruction",
            "shorter",
        ]);
        assert!(result.is_err());
    }
}

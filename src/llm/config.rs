use serde::{Serialize, Serializer};
use std::env;
use std::fmt;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// API credential whose value never shows up in debug or serialized output
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, treating empty or whitespace-only values as absent
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

/// Which backend a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Primary provider
    Anthropic,
    /// Secondary provider
    OpenAi,
    /// Offline fallback used when no credential is configured
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials and endpoint for one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderCredentials {
    pub api_key: ApiKey,
    pub model: String,
    /// Override for the provider's default base URL
    pub api_base: Option<String>,
}

impl ProviderCredentials {
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }
}

/// Provider configuration, resolved once at startup and read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderConfig {
    /// Primary provider (ANTHROPIC_API_KEY)
    pub anthropic: Option<ProviderCredentials>,

    /// Secondary provider (OPENAI_API_KEY)
    pub openai: Option<ProviderCredentials>,

    /// Bound on a single outbound call
    pub timeout_secs: u64,

    /// Maximum tokens requested for a reply
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            anthropic: None,
            openai: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Secret-free view of the configuration, safe to print or log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub selected_provider: ProviderKind,
    pub anthropic_configured: bool,
    pub anthropic_model: Option<String>,
    pub openai_configured: bool,
    pub openai_model: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        Self::from_env_internal(true)
    }

    /// Load configuration from environment variables without reading `.env`
    #[cfg(test)]
    pub(crate) fn from_env_no_dotenv() -> Self {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Self {
        // Load .env file if it exists and not disabled
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let mut config = Self::default();

        config.anthropic = credentials_from_env(
            "ANTHROPIC_API_KEY",
            "ANTHROPIC_MODEL",
            "ANTHROPIC_API_BASE",
            DEFAULT_ANTHROPIC_MODEL,
        );
        config.openai = credentials_from_env(
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "OPENAI_API_BASE",
            DEFAULT_OPENAI_MODEL,
        );

        // Invalid or zero values keep the defaults
        if let Ok(timeout) = env::var("LLM_TIMEOUT_SECONDS") {
            if let Ok(timeout_secs) = timeout.trim().parse::<u64>() {
                if timeout_secs > 0 {
                    config.timeout_secs = timeout_secs;
                }
            }
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.trim().parse::<u32>() {
                if tokens > 0 {
                    config.max_tokens = tokens;
                }
            }
        }

        config
    }

    pub fn with_anthropic(mut self, credentials: ProviderCredentials) -> Self {
        self.anthropic = Some(credentials);
        self
    }

    pub fn with_openai(mut self, credentials: ProviderCredentials) -> Self {
        self.openai = Some(credentials);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        if timeout_secs > 0 {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    /// Configured providers in priority order
    pub fn candidates(&self) -> Vec<ProviderKind> {
        let mut candidates = Vec::new();
        if self.anthropic.is_some() {
            candidates.push(ProviderKind::Anthropic);
        }
        if self.openai.is_some() {
            candidates.push(ProviderKind::OpenAi);
        }
        candidates
    }

    /// The provider a client built from this configuration will use
    pub fn selected(&self) -> ProviderKind {
        self.candidates()
            .first()
            .copied()
            .unwrap_or(ProviderKind::Mock)
    }

    pub fn is_llm_configured(&self) -> bool {
        !self.candidates().is_empty()
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            selected_provider: self.selected(),
            anthropic_configured: self.anthropic.is_some(),
            anthropic_model: self.anthropic.as_ref().map(|c| c.model.clone()),
            openai_configured: self.openai.is_some(),
            openai_model: self.openai.as_ref().map(|c| c.model.clone()),
            timeout_secs: self.timeout_secs,
            max_tokens: self.max_tokens,
        }
    }
}

fn credentials_from_env(
    key_var: &str,
    model_var: &str,
    base_var: &str,
    default_model: &str,
) -> Option<ProviderCredentials> {
    let api_key = env::var(key_var).ok().and_then(ApiKey::new)?;

    let model = env::var(model_var)
        .ok()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default_model.to_string());

    let mut credentials = ProviderCredentials::new(api_key, model);
    if let Ok(api_base) = env::var(base_var) {
        if !api_base.trim().is_empty() {
            credentials.api_base = Some(api_base.trim().to_string());
        }
    }

    Some(credentials)
}

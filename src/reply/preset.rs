use crate::reply::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice the reply is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Professional,
    Casual,
    Enthusiastic,
    Concise,
    Supportive,
    Contrarian,
}

/// Target length bucket for the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplyLength {
    Short,
    Medium,
    Long,
}

/// What the reply is trying to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Agree,
    AddValue,
    AskQuestion,
    Congratulate,
    Encourage,
    Challenge,
    Other,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Enthusiastic,
        Tone::Concise,
        Tone::Supportive,
        Tone::Contrarian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Concise => "concise",
            Tone::Supportive => "supportive",
            Tone::Contrarian => "contrarian",
        }
    }
}

impl ReplyLength {
    pub const ALL: [ReplyLength; 3] = [ReplyLength::Short, ReplyLength::Medium, ReplyLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyLength::Short => "short",
            ReplyLength::Medium => "medium",
            ReplyLength::Long => "long",
        }
    }

    /// Sentence-count band the model is asked to stay within
    pub fn sentence_band(&self) -> (u8, u8) {
        match self {
            ReplyLength::Short => (1, 3),
            ReplyLength::Medium => (3, 5),
            ReplyLength::Long => (5, 8),
        }
    }
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::Agree,
        Intent::AddValue,
        Intent::AskQuestion,
        Intent::Congratulate,
        Intent::Encourage,
        Intent::Challenge,
        Intent::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Agree => "agree",
            Intent::AddValue => "add-value",
            Intent::AskQuestion => "ask-question",
            Intent::Congratulate => "congratulate",
            Intent::Encourage => "encourage",
            Intent::Challenge => "challenge",
            Intent::Other => "other",
        }
    }

    /// One-line explanation rendered next to the intent directive
    pub fn directive(&self) -> &'static str {
        match self {
            Intent::Agree => "Agree with the author and reinforce their main point.",
            Intent::AddValue => "Add a useful perspective, example, or insight the post does not cover.",
            Intent::AskQuestion => "Ask one thoughtful, specific question that invites the author to elaborate.",
            Intent::Congratulate => "Congratulate the author sincerely on the news they shared.",
            Intent::Encourage => "Encourage the author and show appreciation for what they shared.",
            Intent::Challenge => "Respectfully offer a different viewpoint and back it with reasoning.",
            Intent::Other => "Respond naturally to the post.",
        }
    }
}

/// Normalise a user-supplied enum name: trim, lowercase, `_`/space to `-`
fn canonical(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(|c: char| c == '_' || c == ' ', "-")
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = canonical(s);
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownTone(s.to_string()))
    }
}

impl FromStr for ReplyLength {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = canonical(s);
        ReplyLength::ALL
            .into_iter()
            .find(|l| l.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownLength(s.to_string()))
    }
}

impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = canonical(s);
        Intent::ALL
            .into_iter()
            .find(|i| i.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownIntent(s.to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReplyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combination of tone, length and intent selected for a single reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPreset {
    pub tone: Tone,
    pub length: ReplyLength,
    pub intent: Intent,

    /// Extra bullet directives rendered verbatim under "Guidance:"
    #[serde(default)]
    pub guidance: Vec<String>,

    /// Hashtags are forbidden in the reply unless this is set
    #[serde(default)]
    pub allow_hashtags: bool,
}

impl ReplyPreset {
    pub fn new(tone: Tone, length: ReplyLength, intent: Intent) -> Self {
        Self {
            tone,
            length,
            intent,
            guidance: Vec::new(),
            allow_hashtags: false,
        }
    }

    /// Parse a preset from raw tone/length/intent names
    pub fn parse(tone: &str, length: &str, intent: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(tone.parse()?, length.parse()?, intent.parse()?))
    }

    pub fn with_guidance<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guidance = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hashtags(mut self, allow: bool) -> Self {
        self.allow_hashtags = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>().unwrap(), tone);
        }
        for length in ReplyLength::ALL {
            assert_eq!(length.as_str().parse::<ReplyLength>().unwrap(), length);
        }
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), intent);
        }
    }

    #[test]
    fn test_parse_accepts_snake_case_and_caps() {
        assert_eq!("add_value".parse::<Intent>().unwrap(), Intent::AddValue);
        assert_eq!("Ask Question".parse::<Intent>().unwrap(), Intent::AskQuestion);
        assert_eq!("  PROFESSIONAL ".parse::<Tone>().unwrap(), Tone::Professional);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert_eq!(
            "sarcastic".parse::<Tone>(),
            Err(ValidationError::UnknownTone("sarcastic".to_string()))
        );
        assert_eq!(
            "huge".parse::<ReplyLength>(),
            Err(ValidationError::UnknownLength("huge".to_string()))
        );
        assert_eq!(
            "".parse::<Intent>(),
            Err(ValidationError::UnknownIntent("".to_string()))
        );
    }

    #[test]
    fn test_preset_parse() {
        let preset = ReplyPreset::parse("enthusiastic", "short", "congratulate").unwrap();
        assert_eq!(preset.tone, Tone::Enthusiastic);
        assert_eq!(preset.length, ReplyLength::Short);
        assert_eq!(preset.intent, Intent::Congratulate);
        assert!(preset.guidance.is_empty());
        assert!(!preset.allow_hashtags);

        assert!(ReplyPreset::parse("enthusiastic", "tiny", "congratulate").is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Intent::AskQuestion).unwrap();
        assert_eq!(json, "\"ask-question\"");

        let preset: ReplyPreset = serde_json::from_str(
            r#"{"tone": "casual", "length": "medium", "intent": "add-value"}"#,
        )
        .unwrap();
        assert_eq!(preset, ReplyPreset::new(Tone::Casual, ReplyLength::Medium, Intent::AddValue));
    }
}

use crate::reply::catalog;
use crate::reply::preset::ReplyPreset;
use crate::reply::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The LinkedIn post being replied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContext {
    /// Display name of the post author; omitted from the prompt when blank
    pub author_name: String,

    pub post_text: String,

    /// Topic or industry tags, kept sorted so rendering is stable
    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub author_profile_url: Option<String>,

    #[serde(default)]
    pub post_url: Option<String>,

    /// Body of an article linked from the post
    #[serde(default)]
    pub article_text: Option<String>,

    /// User's description of an image attached to the post
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl PostContext {
    pub fn new(author_name: impl Into<String>, post_text: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into().trim().to_string(),
            post_text: post_text.into(),
            tags: BTreeSet::new(),
            author_profile_url: None,
            post_url: None,
            article_text: None,
            image_ref: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.into().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn with_author_profile_url(mut self, url: impl Into<String>) -> Self {
        self.author_profile_url = non_blank(url.into());
        self
    }

    pub fn with_post_url(mut self, url: impl Into<String>) -> Self {
        self.post_url = non_blank(url.into());
        self
    }

    pub fn with_article_text(mut self, text: impl Into<String>) -> Self {
        self.article_text = non_blank(text.into());
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = non_blank(image_ref.into());
        self
    }
}

/// A previously generated draft to revise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorReply {
    pub text: String,

    /// Free-form revision request, e.g. "make it warmer"
    #[serde(default)]
    pub instruction: Option<String>,
}

impl PriorReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = non_blank(instruction.into());
        self
    }
}

/// Everything needed to render one prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub context: PostContext,
    pub preset: ReplyPreset,

    /// Optional catalog label, carried into prompt metadata
    #[serde(default)]
    pub preset_label: Option<String>,

    #[serde(default)]
    pub prior_reply: Option<PriorReply>,
}

impl PromptRequest {
    pub fn new(context: PostContext, preset: ReplyPreset) -> Self {
        Self {
            context,
            preset,
            preset_label: None,
            prior_reply: None,
        }
    }

    pub fn with_prior_reply(mut self, prior: PriorReply) -> Self {
        self.prior_reply = Some(prior);
        self
    }

    pub fn with_preset_label(mut self, label: impl Into<String>) -> Self {
        self.preset_label = Some(label.into());
        self
    }
}

/// String-typed request as read from a JSON/YAML file or CLI flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptInput {
    #[serde(default)]
    pub author_name: Option<String>,
    /// Missing text is reported by prompt validation, not by the parser
    #[serde(default)]
    pub post_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author_profile_url: Option<String>,
    #[serde(default)]
    pub post_url: Option<String>,
    #[serde(default)]
    pub article_text: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,

    /// Catalog preset id; overridden field by field by tone/length/intent
    #[serde(default)]
    pub preset_id: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub allow_hashtags: Option<bool>,

    #[serde(default)]
    pub prior_reply: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}

impl TryFrom<PromptInput> for PromptRequest {
    type Error = ValidationError;

    fn try_from(input: PromptInput) -> Result<Self, Self::Error> {
        let (mut preset, label) = match input.preset_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                let named = catalog::find(id)
                    .ok_or_else(|| ValidationError::UnknownPreset(id.to_string()))?;
                (named.preset.clone(), Some(named.label.to_string()))
            }
            _ => {
                let (Some(tone), Some(length), Some(intent)) =
                    (&input.tone, &input.length, &input.intent)
                else {
                    return Err(ValidationError::MissingPreset);
                };
                (ReplyPreset::parse(tone, length, intent)?, None)
            }
        };

        // Individual overrides on top of a catalog preset
        if input.preset_id.is_some() {
            if let Some(tone) = &input.tone {
                preset.tone = tone.parse()?;
            }
            if let Some(length) = &input.length {
                preset.length = length.parse()?;
            }
            if let Some(intent) = &input.intent {
                preset.intent = intent.parse()?;
            }
        }
        if let Some(allow) = input.allow_hashtags {
            preset.allow_hashtags = allow;
        }

        let mut context = PostContext::new(input.author_name.unwrap_or_default(), input.post_text)
            .with_tags(input.tags);
        if let Some(url) = input.author_profile_url {
            context = context.with_author_profile_url(url);
        }
        if let Some(url) = input.post_url {
            context = context.with_post_url(url);
        }
        if let Some(article) = input.article_text {
            context = context.with_article_text(article);
        }
        if let Some(image_ref) = input.image_ref {
            context = context.with_image_ref(image_ref);
        }

        let mut request = PromptRequest::new(context, preset);
        if let Some(label) = label {
            request = request.with_preset_label(label);
        }

        if let Some(text) = input.prior_reply {
            let mut prior = PriorReply::new(text);
            if let Some(instruction) = input.instruction {
                prior = prior.with_instruction(instruction);
            }
            request = request.with_prior_reply(prior);
        }

        Ok(request)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

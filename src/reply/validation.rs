use crate::reply::context::PostContext;
use thiserror::Error;

/// Upper bound on post text accepted for prompt assembly
pub const MAX_POST_CHARS: usize = 20_000;

/// Article text above this length is accepted but flagged
pub const ARTICLE_TEXT_WARN_LENGTH: usize = 10_000;

pub const MAX_ARTICLE_INPUT_CHARS: usize = 50_000;
pub const MAX_AUTHOR_NAME_CHARS: usize = 200;
/// Applies to both URLs and the image description
pub const MAX_REFERENCE_CHARS: usize = 2_000;

/// Errors raised when a prompt request is malformed
///
/// These are the caller's fault and are recovered by fixing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Post text must not be empty")]
    EmptyPostText,

    #[error("Post text is too long ({length} chars, maximum is {max})")]
    PostTextTooLong { length: usize, max: usize },

    #[error("{field} is too long ({length} chars, maximum is {max})")]
    FieldTooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    #[error("Prior reply text must not be empty when refining a draft")]
    EmptyPriorReply,

    #[error("Unknown tone '{0}'")]
    UnknownTone(String),

    #[error("Unknown length '{0}' (expected short, medium or long)")]
    UnknownLength(String),

    #[error("Unknown intent '{0}'")]
    UnknownIntent(String),

    #[error("Unknown preset_id: {0}")]
    UnknownPreset(String),

    #[error("Either a preset id or tone, length and intent must be provided")]
    MissingPreset,
}

/// Check the hard constraints on a post context
pub fn validate_context(context: &PostContext) -> Result<(), ValidationError> {
    let text = context.post_text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyPostText);
    }

    let length = text.chars().count();
    if length > MAX_POST_CHARS {
        return Err(ValidationError::PostTextTooLong {
            length,
            max: MAX_POST_CHARS,
        });
    }

    check_length("Author name", Some(context.author_name.as_str()), MAX_AUTHOR_NAME_CHARS)?;
    check_length("Author profile URL", context.author_profile_url.as_deref(), MAX_REFERENCE_CHARS)?;
    check_length("Post URL", context.post_url.as_deref(), MAX_REFERENCE_CHARS)?;
    check_length("Image reference", context.image_ref.as_deref(), MAX_REFERENCE_CHARS)?;
    check_length("Article text", context.article_text.as_deref(), MAX_ARTICLE_INPUT_CHARS)?;

    Ok(())
}

fn check_length(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    let length = value.map(|v| v.trim().chars().count()).unwrap_or_default();
    if length > max {
        return Err(ValidationError::FieldTooLong { field, length, max });
    }
    Ok(())
}

/// Return a warning if `url` is present but does not point at LinkedIn
pub fn check_linkedin_url(url: Option<&str>) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;

    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_lowercase();
            if host == "linkedin.com" || host.ends_with(".linkedin.com") {
                None
            } else {
                Some(format!("URL does not appear to be a LinkedIn link: {}", url))
            }
        }
        Err(_) => Some(format!("Could not parse URL: {}", url)),
    }
}

/// Soft issues that do not block prompt assembly
pub fn collect_warnings(context: &PostContext) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(article) = &context.article_text {
        let length = article.chars().count();
        if length > ARTICLE_TEXT_WARN_LENGTH {
            warnings.push(format!(
                "Article text is long ({} chars). Very long articles may reduce reply quality or increase latency.",
                length
            ));
        }
    }

    for (url, label) in [
        (context.author_profile_url.as_deref(), "Author profile URL"),
        (context.post_url.as_deref(), "Post URL"),
    ] {
        if let Some(msg) = check_linkedin_url(url) {
            warnings.push(format!("{}: {}", label, msg));
        }
    }

    warnings
}

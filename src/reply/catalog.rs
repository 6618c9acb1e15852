use crate::reply::preset::{Intent, ReplyLength, ReplyPreset, Tone};
use crate::reply::validation::ValidationError;
use serde::Serialize;
use std::sync::OnceLock;

/// A preset users pick by id
#[derive(Debug, Clone, Serialize)]
pub struct NamedPreset {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub preset: ReplyPreset,
}

fn presets() -> &'static [NamedPreset] {
    static PRESETS: OnceLock<Vec<NamedPreset>> = OnceLock::new();
    PRESETS.get_or_init(|| {
        vec![
            NamedPreset {
                id: "prof_short_agree",
                label: "Professional - Short Agreement",
                preset: ReplyPreset::new(Tone::Professional, ReplyLength::Short, Intent::Agree)
                    .with_guidance([
                        "Acknowledge the author's point directly",
                        "Add a brief supporting observation",
                    ]),
            },
            NamedPreset {
                id: "casual_medium_add",
                label: "Casual - Medium Add-On",
                preset: ReplyPreset::new(Tone::Casual, ReplyLength::Medium, Intent::AddValue)
                    .with_guidance([
                        "Use a conversational, approachable voice",
                        "Offer an additional angle or personal experience",
                    ]),
            },
            NamedPreset {
                id: "supportive_short_encourage",
                label: "Supportive - Short Encouragement",
                preset: ReplyPreset::new(Tone::Supportive, ReplyLength::Short, Intent::Encourage)
                    .with_guidance([
                        "Express genuine appreciation for the post",
                        "Encourage the author to keep sharing",
                    ]),
            },
            NamedPreset {
                id: "contrarian_medium_challenge",
                label: "Contrarian - Medium Challenge",
                preset: ReplyPreset::new(Tone::Contrarian, ReplyLength::Medium, Intent::Challenge)
                    .with_guidance([
                        "Respectfully present an alternative viewpoint",
                        "Back up the counterpoint with reasoning",
                    ]),
            },
            NamedPreset {
                id: "enthusiastic_short_congratulate",
                label: "Enthusiastic - Short Congratulations",
                preset: ReplyPreset::new(Tone::Enthusiastic, ReplyLength::Short, Intent::Congratulate)
                    .with_guidance([
                        "Name the specific achievement",
                        "Keep it warm without exaggeration",
                    ]),
            },
        ]
    })
}

/// All presets in display order
pub fn all() -> &'static [NamedPreset] {
    presets()
}

pub fn find(id: &str) -> Option<&'static NamedPreset> {
    presets().iter().find(|p| p.id == id.trim())
}

/// Look up a preset by id, failing with a validation error when unknown
pub fn resolve(id: &str) -> Result<ReplyPreset, ValidationError> {
    find(id)
        .map(|p| p.preset.clone())
        .ok_or_else(|| ValidationError::UnknownPreset(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_every_preset_has_guidance() {
        for preset in all() {
            assert!(!preset.preset.guidance.is_empty(), "{} has no guidance", preset.id);
            assert!(!preset.preset.allow_hashtags);
        }
    }

    #[test]
    fn test_resolve() {
        let preset = resolve("supportive_short_encourage").unwrap();
        assert_eq!(preset.tone, Tone::Supportive);
        assert_eq!(preset.intent, Intent::Encourage);

        assert_eq!(
            resolve("missing"),
            Err(ValidationError::UnknownPreset("missing".to_string()))
        );
    }
}

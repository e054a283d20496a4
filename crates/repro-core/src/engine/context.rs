//! Per-session conversation state.

use crate::knowledge::TopicId;
use serde::{Deserialize, Serialize};

const ADVANCED_CUES: [&str; 6] = [
    "optimize",
    "best practice",
    "scaling",
    "automation",
    "pipeline",
    "workflow",
];
const BEGINNER_CUES: [&str; 6] = [
    "new to",
    "first time",
    "beginner",
    "never done",
    "confused",
    "help me understand",
];
const INTERMEDIATE_CUES: [&str; 4] = ["i've tried", "working on", "issue with", "problem with"];

/// Inferred experience of the person asking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Unknown,
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Advanced cues beat beginner cues, which beat intermediate ones; no cue keeps `previous`.
    pub fn assess(utterance: &str, previous: Self) -> Self {
        let normalized = utterance.to_lowercase();
        let has = |cues: &[&str]| cues.iter().any(|c| normalized.contains(*c));
        if has(&ADVANCED_CUES[..]) {
            Self::Advanced
        } else if has(&BEGINNER_CUES[..]) {
            Self::Beginner
        } else if has(&INTERMEDIATE_CUES[..]) {
            Self::Intermediate
        } else {
            previous
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Mutable state owned by exactly one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub current_topic: Option<TopicId>,
    /// Append-only; a package mentioned twice appears twice.
    pub software_mentioned: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub utterances: Vec<String>,
    /// Topics answered so far, in order.
    pub advice_given: Vec<TopicId>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advanced_overrides_beginner() {
        let level = ExperienceLevel::assess(
            "I'm new to this but want a best practice pipeline",
            ExperienceLevel::Unknown,
        );
        assert_eq!(level, ExperienceLevel::Advanced);
    }

    #[test]
    fn beginner_overrides_intermediate() {
        let level = ExperienceLevel::assess(
            "First time here, working on my package",
            ExperienceLevel::Advanced,
        );
        assert_eq!(level, ExperienceLevel::Beginner);
    }

    #[test]
    fn intermediate_cue_is_recognized() {
        let level = ExperienceLevel::assess("I've tried renv already", ExperienceLevel::Unknown);
        assert_eq!(level, ExperienceLevel::Intermediate);
    }

    #[test]
    fn no_cue_keeps_previous_level() {
        assert_eq!(
            ExperienceLevel::assess("What about Zenodo?", ExperienceLevel::Beginner),
            ExperienceLevel::Beginner
        );
        assert_eq!(
            ExperienceLevel::assess("", ExperienceLevel::Unknown),
            ExperienceLevel::Unknown
        );
    }

    #[test]
    fn reset_restores_default() {
        let mut ctx = ConversationContext {
            current_topic: Some(TopicId::Stata),
            software_mentioned: vec!["stata".into()],
            experience_level: ExperienceLevel::Advanced,
            utterances: vec!["stata pipeline".into()],
            advice_given: vec![TopicId::Stata],
        };
        ctx.reset();
        assert!(ctx.is_empty());
        ctx.reset();
        assert_eq!(ctx, ConversationContext::new());
    }

    #[test]
    fn level_names_match_serialized_form() {
        for level in [
            ExperienceLevel::Unknown,
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
        ] {
            assert_eq!(serde_json::to_value(level).unwrap(), level.as_str());
        }
    }
}

//! Reply composer: a linear pipeline of independent inclusion gates.
//!
//! 1. acknowledgment, when confidence clears `acknowledgment_threshold` and a draw passes
//! 2. teaching phrase, when the utterance contains "how", "what" or "why" and a draw passes
//! 3. main content: a topic response above `topic_threshold`, otherwise a clarification request
//! 4. one tip for the first detected software package
//! 5. encouragement, on an independent draw
//!
//! Parts are joined with single spaces. Every draw comes from the caller's generator.

use super::context::{ConversationContext, ExperienceLevel};
use super::matcher::ScoredTopic;
use super::ReplyKind;
use crate::error::EngineError;
use crate::knowledge::{KnowledgeBase, PhraseBook, PhraseCategory, SoftwareCatalog};
use rand::Rng;
use serde::{Deserialize, Serialize};

const INTERROGATIVE_CUES: [&str; 3] = ["how", "what", "why"];

/// Gate probabilities and confidence thresholds. A chance of 0 disables a gate, 1 forces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComposerSettings {
    pub acknowledgment_chance: f64,
    pub teaching_chance: f64,
    pub encouragement_chance: f64,
    pub acknowledgment_threshold: f64,
    pub topic_threshold: f64,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            acknowledgment_chance: 0.5,
            teaching_chance: 0.4,
            encouragement_chance: 0.2,
            acknowledgment_threshold: 0.2,
            topic_threshold: 0.1,
        }
    }
}

impl ComposerSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        let chances = [
            ("acknowledgment_chance", self.acknowledgment_chance),
            ("teaching_chance", self.teaching_chance),
            ("encouragement_chance", self.encouragement_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }

    /// Every optional gate off: replies are exactly the main content plus any software tip.
    pub fn plain() -> Self {
        Self {
            acknowledgment_chance: 0.0,
            teaching_chance: 0.0,
            encouragement_chance: 0.0,
            ..Self::default()
        }
    }

    /// Every optional gate on.
    pub fn verbose() -> Self {
        Self {
            acknowledgment_chance: 1.0,
            teaching_chance: 1.0,
            encouragement_chance: 1.0,
            ..Self::default()
        }
    }
}

/// Output of one composition, before it is wrapped into an engine reply.
#[derive(Debug, Clone)]
pub(crate) struct Composition {
    pub(crate) text: String,
    pub(crate) kind: ReplyKind,
}

pub(crate) struct ReplyComposer<'a> {
    pub(crate) knowledge: &'a KnowledgeBase,
    pub(crate) phrases: &'a PhraseBook,
    pub(crate) software: &'a SoftwareCatalog,
    pub(crate) settings: &'a ComposerSettings,
}

impl ReplyComposer<'_> {
    pub(crate) fn compose<R: Rng + ?Sized>(
        &self,
        scored: &ScoredTopic,
        utterance: &str,
        context: &mut ConversationContext,
        rng: &mut R,
    ) -> Composition {
        let normalized = utterance.to_lowercase();
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if scored.confidence > self.settings.acknowledgment_threshold
            && rng.gen_bool(self.settings.acknowledgment_chance)
        {
            parts.push(self.phrases.pick(PhraseCategory::Acknowledgment, rng).to_string());
        }

        if INTERROGATIVE_CUES.iter().any(|c| normalized.contains(c))
            && rng.gen_bool(self.settings.teaching_chance)
        {
            parts.push(self.phrases.pick(PhraseCategory::Teaching, rng).to_string());
        }

        let answered = scored
            .topic
            .filter(|_| scored.confidence > self.settings.topic_threshold)
            .and_then(|topic| self.knowledge.get(topic));
        let kind = match answered {
            Some(entry) => {
                let response = &entry.responses[rng.gen_range(0..entry.responses.len())];
                parts.push(response.clone());
                context.current_topic = Some(entry.topic);
                context.advice_given.push(entry.topic);
                ReplyKind::Topic
            }
            None => {
                parts.push(self.phrases.pick(PhraseCategory::Clarification, rng).to_string());
                ReplyKind::Clarification
            }
        };

        let detected = self.software.detect(utterance);
        if let Some(first) = detected.first() {
            parts.push(first.tip(rng));
        }
        context
            .software_mentioned
            .extend(detected.iter().map(|p| p.name.clone()));

        if rng.gen_bool(self.settings.encouragement_chance) {
            parts.push(self.phrases.pick(PhraseCategory::Encouragement, rng).to_string());
        }

        context.experience_level = ExperienceLevel::assess(utterance, context.experience_level);

        Composition {
            text: parts.join(" "),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matcher::TopicMatcher;
    use crate::knowledge::TopicId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Tables {
        knowledge: KnowledgeBase,
        phrases: PhraseBook,
        software: SoftwareCatalog,
    }

    fn tables() -> Tables {
        Tables {
            knowledge: KnowledgeBase::builtin(),
            phrases: PhraseBook::builtin(),
            software: SoftwareCatalog::builtin().unwrap(),
        }
    }

    fn compose_with(
        t: &Tables,
        settings: ComposerSettings,
        utterance: &str,
        ctx: &mut ConversationContext,
        seed: u64,
    ) -> Composition {
        let composer = ReplyComposer {
            knowledge: &t.knowledge,
            phrases: &t.phrases,
            software: &t.software,
            settings: &settings,
        };
        let scored = TopicMatcher::new(&t.knowledge).score(utterance);
        composer.compose(&scored, utterance, ctx, &mut StdRng::seed_from_u64(seed))
    }

    fn starts_with_any(text: &str, phrases: &[String]) -> bool {
        phrases.iter().any(|p| text.starts_with(p.as_str()))
    }

    #[test]
    fn plain_settings_yield_only_main_content() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        let utterance = "containers and singularity";
        let out = compose_with(&t, ComposerSettings::plain(), utterance, &mut ctx, 3);
        assert_eq!(out.kind, ReplyKind::Topic);
        let docker = t.knowledge.get(TopicId::Docker).unwrap();
        assert!(docker.responses.contains(&out.text));
    }

    #[test]
    fn verbose_settings_include_every_optional_part() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        let out = compose_with(&t, ComposerSettings::verbose(), "why docker", &mut ctx, 11);
        let ack = &t.phrases.pool(PhraseCategory::Acknowledgment).phrases;
        assert!(starts_with_any(&out.text, ack));
        let teaching = &t.phrases.pool(PhraseCategory::Teaching).phrases;
        assert!(teaching.iter().any(|p| out.text.contains(p.as_str())));
        assert!(out.text.contains("For Docker specifically: "));
        let encouragement = &t.phrases.pool(PhraseCategory::Encouragement).phrases;
        assert!(encouragement.iter().any(|p| out.text.ends_with(p.as_str())));
    }

    #[test]
    fn acknowledgment_requires_confidence_above_threshold() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        let settings = ComposerSettings {
            acknowledgment_chance: 1.0,
            ..ComposerSettings::plain()
        };
        // 1 keyword over 9 words: 0.111 clears the topic threshold, not the acknowledgment one.
        let utterance = "so tell me about the archive you all like";
        let out = compose_with(&t, settings, utterance, &mut ctx, 5);
        let ack = &t.phrases.pool(PhraseCategory::Acknowledgment).phrases;
        assert!(!starts_with_any(&out.text, ack));
        assert_eq!(out.kind, ReplyKind::Topic);
    }

    fn contains_teaching(t: &Tables, text: &str) -> bool {
        t.phrases
            .pool(PhraseCategory::Teaching)
            .phrases
            .iter()
            .any(|p| text.contains(p.as_str()))
    }

    fn teaching_only() -> ComposerSettings {
        ComposerSettings {
            teaching_chance: 1.0,
            ..ComposerSettings::plain()
        }
    }

    #[test]
    fn teaching_needs_an_interrogative_cue() {
        let t = tables();
        for seed in 0..20 {
            let mut ctx = ConversationContext::new();
            let out = compose_with(&t, teaching_only(), "zenodo or dataverse", &mut ctx, seed);
            assert_eq!(out.kind, ReplyKind::Topic);
            assert!(!contains_teaching(&t, &out.text), "{}", out.text);
            let repositories = t.knowledge.get(TopicId::Repositories).unwrap();
            assert!(repositories.responses.contains(&out.text));
        }
    }

    #[test]
    fn interrogative_cue_matches_inside_words() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        // "show" contains "how".
        let out = compose_with(&t, teaching_only(), "show me zenodo", &mut ctx, 7);
        assert!(contains_teaching(&t, &out.text), "{}", out.text);
        assert_eq!(out.kind, ReplyKind::Topic);
    }

    #[test]
    fn low_confidence_falls_back_to_clarification() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        let out = compose_with(
            &t,
            ComposerSettings::plain(),
            "one two three four five six seven eight nine ten data",
            &mut ctx,
            2,
        );
        assert_eq!(out.kind, ReplyKind::Clarification);
        assert!(t.phrases.pool(PhraseCategory::Clarification).contains(&out.text));
        assert_eq!(ctx.current_topic, None);
        assert!(ctx.advice_given.is_empty());
    }

    #[test]
    fn only_the_first_software_gets_a_tip() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        let out = compose_with(&t, ComposerSettings::plain(), "stata and python", &mut ctx, 9);
        assert_eq!(out.text.matches("specifically: ").count(), 1);
        assert!(out.text.contains("For Stata specifically: "));
        assert_eq!(ctx.software_mentioned, vec!["stata", "python"]);
    }

    #[test]
    fn software_history_is_not_deduplicated() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        compose_with(&t, ComposerSettings::plain(), "stata", &mut ctx, 1);
        compose_with(&t, ComposerSettings::plain(), "more stata", &mut ctx, 2);
        assert_eq!(ctx.software_mentioned, vec!["stata", "stata"]);
    }

    #[test]
    fn topic_reply_updates_context() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        compose_with(&t, ComposerSettings::plain(), "zenodo or dataverse", &mut ctx, 4);
        assert_eq!(ctx.current_topic, Some(TopicId::Repositories));
        assert_eq!(ctx.advice_given, vec![TopicId::Repositories]);
    }

    #[test]
    fn experience_level_is_updated() {
        let t = tables();
        let mut ctx = ConversationContext::new();
        compose_with(&t, ComposerSettings::plain(), "I'm confused about data", &mut ctx, 4);
        assert_eq!(ctx.experience_level, ExperienceLevel::Beginner);
        compose_with(&t, ComposerSettings::plain(), "docker again", &mut ctx, 4);
        assert_eq!(ctx.experience_level, ExperienceLevel::Beginner);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let settings = ComposerSettings {
            teaching_chance: 1.5,
            ..ComposerSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(EngineError::InvalidProbability { name: "teaching_chance", .. })
        ));
    }
}

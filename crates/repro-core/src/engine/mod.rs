//! Response engine: intent check, topic match, reply composition.
//!
//! The engine owns only immutable tables. All per-conversation state lives in the
//! [`ConversationContext`] the caller passes in, and every random choice is drawn from
//! the caller's generator, so a seeded `StdRng` replays a conversation exactly.

mod composer;
mod context;
mod intent;
mod matcher;

pub use composer::ComposerSettings;
pub use context::{ConversationContext, ExperienceLevel};
pub use intent::{classify_intent, Intent};
pub use matcher::{ScoredTopic, TopicMatcher};

use composer::ReplyComposer;

use crate::error::EngineError;
use crate::knowledge::{KnowledgeBase, PhraseBook, PhraseCategory, SoftwareCatalog, TopicId};
use rand::Rng;
use serde::Serialize;

/// Which path produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Greeting,
    Closing,
    Topic,
    Clarification,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineReply {
    pub text: String,
    pub kind: ReplyKind,
    /// Topic whose response was used; `None` for intents and clarifications.
    pub topic: Option<TopicId>,
    pub confidence: f64,
}

pub struct ResponseEngine {
    knowledge: KnowledgeBase,
    phrases: PhraseBook,
    software: SoftwareCatalog,
    settings: ComposerSettings,
}

impl ResponseEngine {
    pub fn new(
        knowledge: KnowledgeBase,
        phrases: PhraseBook,
        software: SoftwareCatalog,
        settings: ComposerSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self {
            knowledge,
            phrases,
            software,
            settings,
        })
    }

    /// Built-in tables with default gate probabilities.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::with_settings(ComposerSettings::default())
    }

    pub fn with_settings(settings: ComposerSettings) -> Result<Self, EngineError> {
        Self::new(
            KnowledgeBase::builtin(),
            PhraseBook::builtin(),
            SoftwareCatalog::builtin()?,
            settings,
        )
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    pub fn software(&self) -> &SoftwareCatalog {
        &self.software
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Scores `utterance` against the knowledge base without touching any context.
    pub fn match_topic(&self, utterance: &str) -> ScoredTopic {
        TopicMatcher::new(&self.knowledge).score(utterance)
    }

    /// Produces one reply and updates `context`.
    ///
    /// Greeting and closing intents short-circuit before topic matching, so they leave the
    /// experience level, software history and current topic unchanged. The utterance is
    /// recorded on every path.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        utterance: &str,
        context: &mut ConversationContext,
        rng: &mut R,
    ) -> EngineReply {
        context.utterances.push(utterance.to_string());

        if let Some(intent) = classify_intent(utterance) {
            let (category, kind) = match intent {
                Intent::Greeting => (PhraseCategory::Greeting, ReplyKind::Greeting),
                Intent::Closing => (PhraseCategory::Closing, ReplyKind::Closing),
            };
            tracing::debug!(target: "repro::engine", ?intent, "Intent short-circuit");
            return EngineReply {
                text: self.phrases.pick(category, rng).to_string(),
                kind,
                topic: None,
                confidence: 0.0,
            };
        }

        let scored = self.match_topic(utterance);
        tracing::debug!(
            target: "repro::engine",
            topic = scored.topic.map(|t| t.as_str()).unwrap_or("none"),
            score = scored.score,
            confidence = scored.confidence,
            "Topic scored"
        );

        let composer = ReplyComposer {
            knowledge: &self.knowledge,
            phrases: &self.phrases,
            software: &self.software,
            settings: &self.settings,
        };
        let composition = composer.compose(&scored, utterance, context, rng);
        let topic = match composition.kind {
            ReplyKind::Topic => scored.topic,
            _ => None,
        };
        EngineReply {
            text: composition.text,
            kind: composition.kind,
            topic,
            confidence: scored.confidence,
        }
    }

    /// Opening line for a new conversation.
    pub fn greeting<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.phrases.pick(PhraseCategory::Greeting, rng)
    }

    pub fn farewell<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.phrases.pick(PhraseCategory::Closing, rng)
    }

    /// Topics the engine can talk about, one bullet per line.
    pub fn help_text(&self) -> String {
        let mut out = String::from("I can help with:\n");
        for topic in self.knowledge.topics() {
            out.push_str("  • ");
            out.push_str(topic.label());
            out.push('\n');
        }
        out.push_str("Just ask me about any of these topics!");
        out
    }
}

//! Topic matcher: word-weighted keyword presence scoring over the knowledge base.

use crate::knowledge::{KnowledgeBase, TopicId};
use serde::Serialize;

/// Result of matching one utterance. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredTopic {
    pub topic: Option<TopicId>,
    /// Sum of word counts of the winning topic's keywords present in the utterance.
    pub score: usize,
    /// `score / max(word_count, 1)`. Overlapping multi-word keywords can push this above 1.
    pub confidence: f64,
}

impl ScoredTopic {
    pub const NONE: Self = Self {
        topic: None,
        score: 0,
        confidence: 0.0,
    };
}

pub struct TopicMatcher<'a> {
    knowledge: &'a KnowledgeBase,
}

impl<'a> TopicMatcher<'a> {
    pub fn new(knowledge: &'a KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Scores every entry and keeps the first one with the strictly greatest score.
    /// Each keyword counts once no matter how often it occurs.
    pub fn score(&self, utterance: &str) -> ScoredTopic {
        let normalized = utterance.to_lowercase();
        let mut best = ScoredTopic::NONE;

        for entry in self.knowledge.entries() {
            let score: usize = entry
                .keywords
                .iter()
                .filter(|k| normalized.contains(k.as_str()))
                .map(|k| k.split_whitespace().count())
                .sum();
            if score > best.score {
                best.score = score;
                best.topic = Some(entry.topic);
            }
        }

        if best.topic.is_none() {
            return ScoredTopic::NONE;
        }
        let words = normalized.split_whitespace().count().max(1);
        best.confidence = best.score as f64 / words as f64;
        best
    }
}

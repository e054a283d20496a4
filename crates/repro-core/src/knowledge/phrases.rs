//! Phrase pools: interchangeable strings per conversational role.

use crate::error::EngineError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseCategory {
    Greeting = 0,
    Acknowledgment = 1,
    Teaching = 2,
    Encouragement = 3,
    Closing = 4,
    /// Asked for when the engine cannot claim a topic.
    Clarification = 5,
}

impl PhraseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Acknowledgment => "acknowledgment",
            Self::Teaching => "teaching",
            Self::Encouragement => "encouragement",
            Self::Closing => "closing",
            Self::Clarification => "clarification",
        }
    }

    pub fn all() -> [Self; 6] {
        [
            Self::Greeting,
            Self::Acknowledgment,
            Self::Teaching,
            Self::Encouragement,
            Self::Closing,
            Self::Clarification,
        ]
    }

    #[inline]
    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PhraseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty list of phrases for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhrasePool {
    pub category: PhraseCategory,
    pub phrases: Vec<String>,
}

impl PhrasePool {
    pub fn new<I>(category: PhraseCategory, phrases: I) -> Result<Self, EngineError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        if phrases.is_empty() {
            return Err(EngineError::EmptyPool(category));
        }
        Ok(Self { category, phrases })
    }

    /// Uniform choice among the pool's phrases.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.phrases[rng.gen_range(0..self.phrases.len())]
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }
}

/// One validated pool per [`PhraseCategory`].
#[derive(Debug, Clone)]
pub struct PhraseBook {
    pools: Vec<PhrasePool>,
}

impl PhraseBook {
    /// Requires at least one pool for every category. A later pool for the same category
    /// replaces the earlier one.
    pub fn new(pools: Vec<PhrasePool>) -> Result<Self, EngineError> {
        let mut slots: Vec<Option<PhrasePool>> = vec![None; PhraseCategory::all().len()];
        for pool in pools {
            if pool.phrases.is_empty() {
                return Err(EngineError::EmptyPool(pool.category));
            }
            let index = pool.category.index();
            slots[index] = Some(pool);
        }
        let mut ordered = Vec::with_capacity(slots.len());
        for (slot, category) in slots.into_iter().zip(PhraseCategory::all()) {
            ordered.push(slot.ok_or(EngineError::EmptyPool(category))?);
        }
        Ok(Self { pools: ordered })
    }

    pub fn pool(&self, category: PhraseCategory) -> &PhrasePool {
        &self.pools[category.index()]
    }

    pub fn pick<R: Rng + ?Sized>(&self, category: PhraseCategory, rng: &mut R) -> &str {
        self.pool(category).pick(rng)
    }

    pub fn builtin() -> Self {
        let pool = |category, phrases: &[&str]| PhrasePool {
            category,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        };
        Self {
            pools: vec![
                pool(
                    PhraseCategory::Greeting,
                    &[
                        "Hello! I'm Lars Vilhuber, Data Editor at the American Economic Association. How can I help you with reproducibility today?",
                        "Hi there! I work on data transparency and reproducibility in economics. What questions do you have?",
                        "Welcome! I'm here to help with questions about replication packages, data citation, or reproducible research.",
                    ],
                ),
                pool(
                    PhraseCategory::Acknowledgment,
                    &[
                        "That's a great question.",
                        "This is something many researchers struggle with.",
                        "You're right to be thinking about this.",
                        "Good point - let me elaborate.",
                        "This is indeed important to consider.",
                    ],
                ),
                pool(
                    PhraseCategory::Teaching,
                    &[
                        "Let me break this down step by step.",
                        "Here's how I think about this:",
                        "In my experience with thousands of replication packages,",
                        "The key insight here is",
                        "Think about it this way:",
                    ],
                ),
                pool(
                    PhraseCategory::Encouragement,
                    &[
                        "You're on the right track!",
                        "Every step toward reproducibility matters.",
                        "Don't let perfect be the enemy of good.",
                        "This is great progress!",
                        "Keep up the good work!",
                    ],
                ),
                pool(
                    PhraseCategory::Closing,
                    &[
                        "Remember, perfect is the enemy of good - start with making your work reproducible by yourself!",
                        "Feel free to check out my self-checking reproducibility guide for more tips.",
                        "Good luck with your research! The reproducibility community is here to help.",
                        "Keep working on computational empathy - it gets easier with practice!",
                    ],
                ),
                pool(
                    PhraseCategory::Clarification,
                    &[
                        "Could you tell me more about your specific situation? Are you working with a particular software or type of data?",
                        "I'd be happy to help! Could you provide more details about what aspect of reproducibility you're interested in?",
                        "That's interesting. To give you the most relevant advice, could you tell me what software you're using and what kind of project you're working on?",
                        "Let me understand better - are you preparing a replication package, or trying to reproduce someone else's work?",
                    ],
                ),
            ],
        }
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn builtin_has_every_category_in_order() {
        let book = PhraseBook::builtin();
        for category in PhraseCategory::all() {
            assert_eq!(book.pool(category).category, category);
            assert!(!book.pool(category).phrases.is_empty());
        }
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = PhrasePool::new(PhraseCategory::Teaching, ["  "]).unwrap_err();
        assert!(matches!(err, EngineError::EmptyPool(PhraseCategory::Teaching)));
    }

    #[test]
    fn missing_category_is_rejected() {
        let pools = PhraseCategory::all()
            .into_iter()
            .filter(|c| *c != PhraseCategory::Closing)
            .map(|c| PhrasePool::new(c, ["x"]).unwrap())
            .collect();
        let err = PhraseBook::new(pools).unwrap_err();
        assert!(matches!(err, EngineError::EmptyPool(PhraseCategory::Closing)));
    }

    #[test]
    fn later_pool_replaces_earlier_one() {
        let mut pools: Vec<PhrasePool> = PhraseCategory::all()
            .into_iter()
            .map(|c| PhrasePool::new(c, ["first"]).unwrap())
            .collect();
        pools.push(PhrasePool::new(PhraseCategory::Closing, ["second"]).unwrap());
        let book = PhraseBook::new(pools).unwrap();
        assert_eq!(book.pool(PhraseCategory::Closing).phrases, vec!["second"]);
        assert_eq!(book.pool(PhraseCategory::Greeting).phrases, vec!["first"]);
    }

    #[test]
    fn pick_eventually_covers_the_pool() {
        let pool = PhraseBook::builtin().pool(PhraseCategory::Greeting).clone();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pool.pick(&mut rng).to_string());
        }
        assert_eq!(seen.len(), pool.phrases.len());
    }
}

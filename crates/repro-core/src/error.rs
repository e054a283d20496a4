//! Error type for construction-time failures. Reply paths never fail.

use crate::knowledge::{PhraseCategory, TopicId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("topic {0} has no keywords")]
    EmptyKeywords(TopicId),

    #[error("topic {0} has no responses")]
    EmptyResponses(TopicId),

    #[error("topic {0} is declared more than once")]
    DuplicateTopic(TopicId),

    #[error("phrase pool {0} is empty")]
    EmptyPool(PhraseCategory),

    #[error("software profile {0} is invalid: {1}")]
    InvalidSoftware(String, String),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("knowledge file {path}: {source}")]
    KnowledgeIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge file is malformed: {0}")]
    KnowledgeFormat(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

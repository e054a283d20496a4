//! repro-core: keyword-driven reproducibility chatbot (knowledge tables, topic matcher,
//! reply composer, per-session context and the session store the gateway owns).

mod engine;
mod error;
mod knowledge;
mod session;
mod shared;

// Shared
pub use shared::{CoreConfig, DEFAULT_BOT_NAME, DEFAULT_HISTORY_LIMIT};

pub use error::EngineError;

// Knowledge tables
pub use knowledge::{
    KnowledgeBase, KnowledgeEntry, PhraseBook, PhraseCategory, PhrasePool, SoftwareCatalog,
    SoftwareProfile, TopicId,
};

// Engine
pub use engine::{
    classify_intent, ComposerSettings, ConversationContext, EngineReply, ExperienceLevel, Intent,
    ReplyKind, ResponseEngine, ScoredTopic, TopicMatcher,
};

// Sessions
pub use session::{ChatReply, Role, SessionSnapshot, SessionStore, Turn};

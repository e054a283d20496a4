//! Shared configuration used by the gateway and the REPL.

use crate::engine::{ComposerSettings, ResponseEngine};
use crate::error::EngineError;
use crate::knowledge::{KnowledgeBase, PhraseBook, SoftwareCatalog};
use serde::{Deserialize, Serialize};

/// Name the bot introduces itself with when none is configured.
pub const DEFAULT_BOT_NAME: &str = "Lars Vilhuber Chatbot";

/// Transcript entries kept per session when not configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Global application configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown by the status endpoint.
    pub app_name: String,
    /// Bot name reported by the health probe and used as the REPL speaker label.
    pub bot_name: String,
    pub host: String,
    pub port: u16,
    /// Optional JSON knowledge file; built-in tables when unset or missing.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    /// Transcript entries kept per session (user and assistant turns both count).
    pub history_limit: usize,
    /// Idle sessions older than this are evicted. 0 disables eviction.
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    #[serde(default)]
    pub composer: ComposerSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Reproducibility Chat Gateway".to_string(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            knowledge_path: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            session_ttl_secs: 3600,
            sweep_interval_secs: 60,
            composer: ComposerSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `REPRO__*` > file at `REPRO_CONFIG`
    /// (default `config/gateway`) > defaults.
    pub fn load() -> Result<Self, EngineError> {
        let config_path =
            std::env::var("REPRO_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> Result<Self, EngineError> {
        let defaults = Self::default();
        let composer = defaults.composer;
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("bot_name", defaults.bot_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("history_limit", defaults.history_limit as i64)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs as i64)?
            .set_default("sweep_interval_secs", defaults.sweep_interval_secs as i64)?
            .set_default("composer.acknowledgment_chance", composer.acknowledgment_chance)?
            .set_default("composer.teaching_chance", composer.teaching_chance)?
            .set_default("composer.encouragement_chance", composer.encouragement_chance)?
            .set_default("composer.acknowledgment_threshold", composer.acknowledgment_threshold)?
            .set_default("composer.topic_threshold", composer.topic_threshold)?;

        let builder = builder.add_source(config::File::with_name(config_path).required(false));

        let built = builder
            .add_source(config::Environment::with_prefix("REPRO").separator("__"))
            .build()?;

        let config: Self = built.try_deserialize()?;
        config.composer.validate()?;
        Ok(config)
    }

    /// Builds the engine this config describes.
    pub fn build_engine(&self) -> Result<ResponseEngine, EngineError> {
        let knowledge = match &self.knowledge_path {
            Some(path) => KnowledgeBase::load_json_path(path)?,
            None => KnowledgeBase::builtin(),
        };
        ResponseEngine::new(
            knowledge,
            PhraseBook::builtin(),
            SoftwareCatalog::builtin()?,
            self.composer,
        )
    }
}

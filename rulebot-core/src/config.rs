//! Bot configuration.

use std::time::Duration;

use crate::fuzzy::DEFAULT_CUTOFF;

/// Configuration for a bot instance.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Prefix a message must start with to be treated as a command.
    pub command_prefix: String,

    /// Override for the rules API base URL.
    pub api_base_url: Option<String>,

    /// Minimum fuzzy score (0-100) for disambiguation candidates.
    pub score_cutoff: u8,

    /// How long a disambiguation offer waits for a reply.
    pub reply_timeout: Duration,

    /// How long character creation waits for the stats reply.
    pub create_timeout: Duration,

    /// Path of the SQLite character database.
    pub db_path: String,
}

impl BotConfig {
    /// Create a config with the stock defaults.
    pub fn new() -> Self {
        Self {
            command_prefix: "!".to_string(),
            api_base_url: None,
            score_cutoff: DEFAULT_CUTOFF,
            reply_timeout: Duration::from_secs(30),
            create_timeout: Duration::from_secs(60),
            db_path: "rulebot.db".to_string(),
        }
    }

    /// Create a config from the environment.
    ///
    /// Honors `OPEN5E_URL` (API base override) and `RULEBOT_DB` (database
    /// path); everything else keeps its default.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(url) = std::env::var("OPEN5E_URL") {
            config.api_base_url = Some(url);
        }
        if let Ok(path) = std::env::var("RULEBOT_DB") {
            config.db_path = path;
        }
        config
    }

    /// Set the command prefix.
    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Set the rules API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the fuzzy score cutoff.
    pub fn with_score_cutoff(mut self, cutoff: u8) -> Self {
        self.score_cutoff = cutoff;
        self
    }

    /// Set the disambiguation reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Set the character-creation reply timeout.
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// Set the character database path.
    pub fn with_db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = path.into();
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new()
    }
}

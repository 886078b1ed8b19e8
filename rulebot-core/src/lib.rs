//! Tabletop rules lookup bot engine.
//!
//! This crate provides:
//! - Strict `NdM` dice expression parsing and rolling
//! - Fuzzy candidate ranking for imprecise rule names
//! - Fixed-layout spell, condition, and weapon formatting
//! - A disambiguation dialogue bounded by reply timeouts
//! - A SQLite-backed character sheet store
//!
//! The chat transport is not here: front-ends implement [`chat::ChatHost`]
//! and feed inbound messages to [`Bot::handle_message`].
//!
//! # Quick Start
//!
//! ```ignore
//! use rulebot_core::{Bot, BotConfig, CharacterStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_env();
//!     let store = CharacterStore::open(&config.db_path).await?;
//!     let api = open5e::Client::new();
//!
//!     let bot = Bot::new(my_chat_host, api, store, config);
//!     while let Some(message) = next_inbound_message().await {
//!         bot.handle_message(&message).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod chat;
pub mod commands;
pub mod config;
pub mod dialogue;
pub mod dice;
pub mod format;
pub mod fuzzy;
pub mod store;
pub mod testing;

// Primary public API
pub use character::{AbilityScores, CharacterClass, CharacterSheet, SheetError};
pub use chat::{ChannelId, ChatHost, IncomingMessage, UserId};
pub use commands::{Bot, CommandError, LookupKind, RulesApi};
pub use config::BotConfig;
pub use dialogue::Resolution;
pub use dice::{DiceExpression, DiceRoll};
pub use fuzzy::{Candidate, Ranked};
pub use store::{CharacterStore, StoreError};

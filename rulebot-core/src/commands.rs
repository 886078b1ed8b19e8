//! Command dispatch and handlers.
//!
//! A [`Bot`] owns its collaborators explicitly: the chat host it answers
//! through, the rules API it queries, and the character store. Inbound
//! messages that start with the command prefix are routed to a handler;
//! each handler runs to completion (including any bounded reply waits)
//! and every failure becomes a user-visible message that ends only the
//! current interaction.

use async_trait::async_trait;
use thiserror::Error;

use open5e::Record;

use crate::character::{self, CharacterClass, CharacterSheet, SheetError};
use crate::chat::{ChatHost, IncomingMessage};
use crate::config::BotConfig;
use crate::dialogue::{self, Resolution};
use crate::dice::{self, DiceError};
use crate::format;
use crate::fuzzy;
use crate::store::{CharacterStore, StoreError};

/// The rules lookups the remote API supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Spell,
    Condition,
    Weapon,
}

impl LookupKind {
    pub fn name(&self) -> &'static str {
        match self {
            LookupKind::Spell => "spell",
            LookupKind::Condition => "condition",
            LookupKind::Weapon => "weapon",
        }
    }

    fn progress_message(&self) -> &'static str {
        match self {
            LookupKind::Spell => "Querying spell rules...",
            LookupKind::Condition => "Querying condition rules...",
            LookupKind::Weapon => "Querying weapon rules...",
        }
    }

    fn format(&self, record: &Record) -> String {
        match self {
            LookupKind::Spell => format::format_spell(record),
            LookupKind::Condition => format::format_condition(record),
            LookupKind::Weapon => format::format_weapon(record),
        }
    }
}

/// The remote rules API collaborator.
#[async_trait]
pub trait RulesApi: Send + Sync {
    /// Search records of one kind by free-text query.
    async fn search(&self, kind: LookupKind, query: &str) -> Result<Vec<Record>, open5e::Error>;
}

#[async_trait]
impl RulesApi for open5e::Client {
    async fn search(&self, kind: LookupKind, query: &str) -> Result<Vec<Record>, open5e::Error> {
        match kind {
            LookupKind::Spell => self.search_spells(query).await,
            LookupKind::Condition => self.search_conditions(query).await,
            LookupKind::Weapon => self.search_weapons(query).await,
        }
    }
}

/// Errors a command handler can end with.
///
/// None of these are fatal; each maps to a user-visible message and a
/// log level, and terminates only the current interaction.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] open5e::Error),

    #[error("query returned no records")]
    EmptyResult,

    #[error("every candidate was skipped")]
    Exhausted,

    #[error("reply wait timed out")]
    Timeout,

    #[error("cancelled by the requester")]
    Cancelled,

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(&'static str),
}

impl CommandError {
    /// The message sent back to the requester.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Dice(DiceError::InvalidExpression(_)) => {
                "Something went wrong. Please verify format. (ex. 4D20, 6D6)".to_string()
            }
            CommandError::Dice(error) => error.to_string(),
            CommandError::Sheet(SheetError::UnknownClass(class)) => {
                let known = CharacterClass::all().map(|c| c.name()).join(", ");
                format!("Unknown class {class:?}. Pick one of: {known}.")
            }
            CommandError::Sheet(SheetError::WrongStatCount(_)) => {
                "Reply with exactly seven numbers: level then STR DEX CON INT WIS CHA."
                    .to_string()
            }
            CommandError::Sheet(SheetError::NotAnInteger(token)) => {
                format!("{token:?} is not a number. Reply with level then six ability scores.")
            }
            CommandError::Store(_) => {
                "Something went wrong saving your character. Please try again in a few moments."
                    .to_string()
            }
            CommandError::Transport(_) => {
                "Something went wrong. Please try again in a few moments.".to_string()
            }
            CommandError::EmptyResult => {
                "No results found. Please verify spelling/format and try again.".to_string()
            }
            CommandError::Exhausted => {
                "No more matches. Please verify spelling/format and try again.".to_string()
            }
            CommandError::Timeout => "No response received. Command cancelled.".to_string(),
            CommandError::Cancelled => "Lookup cancelled.".to_string(),
            CommandError::UnknownCommand(_) => {
                "Unknown command. Try ping, roll, spell, condition, weapon, or character."
                    .to_string()
            }
            CommandError::Usage(usage) => usage.to_string(),
        }
    }

    /// True for failures of the infrastructure rather than the input.
    fn is_infrastructure(&self) -> bool {
        matches!(self, CommandError::Transport(_) | CommandError::Store(_))
    }
}

/// The bot: command dispatch over explicitly owned collaborators.
pub struct Bot<H, A> {
    host: H,
    api: A,
    store: CharacterStore,
    config: BotConfig,
}

impl<H: ChatHost, A: RulesApi> Bot<H, A> {
    /// Create a bot from its collaborators.
    pub fn new(host: H, api: A, store: CharacterStore, config: BotConfig) -> Self {
        Self {
            host,
            api,
            store,
            config,
        }
    }

    /// The chat host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The rules API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The character store.
    pub fn store(&self) -> &CharacterStore {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Handle one inbound message.
    ///
    /// Messages without the command prefix are ignored. A recognized
    /// command runs to completion before this returns; failures are
    /// reported to the requester and logged, never propagated.
    pub async fn handle_message(&self, message: &IncomingMessage) {
        let content = message.content.trim();
        let Some(invocation) = content.strip_prefix(&self.config.command_prefix) else {
            return;
        };

        let (name, args) = match invocation.trim().split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (invocation.trim(), ""),
        };
        let name = name.to_lowercase();

        let outcome = match name.as_str() {
            "ping" => self.ping(message).await,
            "roll" => self.roll(message, args).await,
            "spell" => self.lookup(message, LookupKind::Spell, args).await,
            "condition" => self.lookup(message, LookupKind::Condition, args).await,
            "weapon" => self.lookup(message, LookupKind::Weapon, args).await,
            "character" => self.character(message, args).await,
            other => Err(CommandError::UnknownCommand(other.to_string())),
        };

        if let Err(error) = outcome {
            if error.is_infrastructure() {
                tracing::error!(command = %name, %error, "Command failed");
            } else {
                tracing::info!(command = %name, %error, "Command rejected");
            }
            self.host
                .send_text(message.channel, &error.user_message())
                .await;
        }
    }

    async fn ping(&self, message: &IncomingMessage) -> Result<(), CommandError> {
        self.host.send_text(message.channel, "pong").await;
        tracing::info!("Ping ran successfully");
        Ok(())
    }

    async fn roll(&self, message: &IncomingMessage, args: &str) -> Result<(), CommandError> {
        let roll = dice::roll(args)?;
        self.host
            .send_text(
                message.channel,
                &format!(
                    "You rolled {}d{}\nResults: {:?} = {}",
                    roll.number(),
                    roll.sides(),
                    roll.rolls(),
                    roll.total()
                ),
            )
            .await;
        tracing::info!(user = %message.author, "Rolled {} for a total of {}", roll, roll.total());
        Ok(())
    }

    async fn lookup(
        &self,
        message: &IncomingMessage,
        kind: LookupKind,
        query: &str,
    ) -> Result<(), CommandError> {
        if query.is_empty() {
            return Err(CommandError::Usage(
                "Tell me what to look up, e.g. spell fireball",
            ));
        }

        self.host
            .send_text(message.channel, kind.progress_message())
            .await;

        let records = self.api.search(kind, query).await?;
        if records.is_empty() {
            return Err(CommandError::EmptyResult);
        }

        let ranked = fuzzy::rank(query, &records, "name", self.config.score_cutoff);
        let resolution = dialogue::resolve(
            &self.host,
            message.channel,
            message.author,
            ranked,
            self.config.reply_timeout,
        )
        .await;

        match resolution {
            Resolution::Exact(record) | Resolution::Chosen(record) => {
                self.host
                    .send_text(message.channel, &kind.format(&record))
                    .await;
                tracing::info!(
                    kind = kind.name(),
                    result = record.name().unwrap_or("unknown"),
                    "Query {query:?} succeeded"
                );
                Ok(())
            }
            Resolution::TimedOut => Err(CommandError::Timeout),
            Resolution::Cancelled => Err(CommandError::Cancelled),
            Resolution::Exhausted => Err(CommandError::Exhausted),
        }
    }

    async fn character(&self, message: &IncomingMessage, args: &str) -> Result<(), CommandError> {
        let (action, rest) = match args.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, rest.trim()),
            None => (args, ""),
        };

        match action.to_lowercase().as_str() {
            "create" => self.character_create(message, rest).await,
            "delete" => self.character_delete(message, rest).await,
            "update" => {
                // Declared non-goal: answer honestly instead of half-working.
                self.host
                    .send_text(message.channel, "Character update isn't supported yet.")
                    .await;
                Ok(())
            }
            _ => Err(CommandError::Usage(
                "Usage: character <create|delete> <name> ...",
            )),
        }
    }

    async fn character_create(
        &self,
        message: &IncomingMessage,
        args: &str,
    ) -> Result<(), CommandError> {
        let mut tokens = args.split_whitespace();
        let (Some(name), Some(class_token), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(CommandError::Usage("Usage: character create <name> <class>"));
        };

        let class: CharacterClass = class_token.parse()?;

        self.host
            .send_text(
                message.channel,
                &format!(
                    "Creating **{name}** the {class}. Reply with level and six ability scores \
                     (STR DEX CON INT WIS CHA), e.g. 3 16 14 13 12 10 8"
                ),
            )
            .await;

        let Some(reply) = self
            .host
            .next_reply(message.channel, message.author, self.config.create_timeout)
            .await
        else {
            return Err(CommandError::Timeout);
        };

        let (level, abilities) = character::parse_stats(&reply.content)?;

        let sheet = CharacterSheet {
            owner: message.author,
            name: name.to_string(),
            class,
            level,
            abilities,
        };
        self.store.create(&sheet).await?;

        self.host
            .send_text(
                message.channel,
                &format!("Saved {name}, level {level} {class}."),
            )
            .await;
        tracing::info!(owner = %message.author, name, "Character created");
        Ok(())
    }

    async fn character_delete(
        &self,
        message: &IncomingMessage,
        args: &str,
    ) -> Result<(), CommandError> {
        let name = args.trim();
        if name.is_empty() {
            return Err(CommandError::Usage("Usage: character delete <name>"));
        }

        let removed = self.store.delete(message.author, name).await?;
        let reply = if removed {
            format!("Deleted {name}.")
        } else {
            format!("No character named {name} found.")
        };
        self.host.send_text(message.channel, &reply).await;
        tracing::info!(owner = %message.author, name, removed, "Character delete");
        Ok(())
    }
}

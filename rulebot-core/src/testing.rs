//! Testing utilities for the bot.
//!
//! This module provides deterministic doubles for the two external
//! collaborators:
//! - `MockChat` records outgoing messages and plays back scripted replies
//! - `MockRulesApi` plays back scripted search results without a network
//!
//! Both are consumed in order, like a transcript.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use open5e::Record;

use crate::chat::{ChannelId, ChatHost, IncomingMessage, UserId};
use crate::commands::{LookupKind, RulesApi};

/// Build a record with just a `name` field.
pub fn record(name: &str) -> Record {
    record_from(serde_json::json!({ "name": name }))
}

/// Build a record from raw JSON (panics on non-object input).
pub fn record_from(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("record fixtures must be JSON objects")
}

/// A scripted reply slot: a message, or a timed-out wait.
type ReplySlot = Option<String>;

/// A mock chat host with scripted replies.
#[derive(Default)]
pub struct MockChat {
    outgoing: Mutex<Vec<(ChannelId, String)>>,
    replies: Mutex<VecDeque<ReplySlot>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next reply wait to yield this message.
    pub async fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Some(text.into()));
    }

    /// Script the next reply wait to time out.
    pub async fn queue_timeout(&self) {
        self.replies.lock().await.push_back(None);
    }

    /// Every message text sent so far, in order.
    pub async fn sent(&self) -> Vec<String> {
        self.outgoing
            .lock()
            .await
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// The most recent message text, if any.
    pub async fn last_sent(&self) -> Option<String> {
        self.outgoing
            .lock()
            .await
            .last()
            .map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl ChatHost for MockChat {
    async fn send_text(&self, channel: ChannelId, text: &str) {
        self.outgoing.lock().await.push((channel, text.to_string()));
    }

    async fn next_reply(
        &self,
        channel: ChannelId,
        author: UserId,
        _timeout: Duration,
    ) -> Option<IncomingMessage> {
        // An unscripted wait behaves like a timeout.
        match self.replies.lock().await.pop_front() {
            Some(Some(content)) => Some(IncomingMessage {
                author,
                channel,
                content,
            }),
            Some(None) | None => None,
        }
    }
}

/// A mock rules API with scripted search outcomes.
#[derive(Default)]
pub struct MockRulesApi {
    responses: Mutex<VecDeque<Result<Vec<Record>, open5e::Error>>>,
}

impl MockRulesApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next search to return these records.
    pub async fn queue_results(&self, records: Vec<Record>) {
        self.responses.lock().await.push_back(Ok(records));
    }

    /// Script the next search to fail.
    pub async fn queue_error(&self, error: open5e::Error) {
        self.responses.lock().await.push_back(Err(error));
    }
}

#[async_trait]
impl RulesApi for MockRulesApi {
    async fn search(&self, _kind: LookupKind, _query: &str) -> Result<Vec<Record>, open5e::Error> {
        // An unscripted search finds nothing.
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

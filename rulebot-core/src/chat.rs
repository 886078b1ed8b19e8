//! The host messaging collaborator.
//!
//! The chat transport itself (gateway, events, reconnects) belongs to the
//! embedding front-end. The core only needs to send text into a channel
//! and wait, bounded, for one follow-up message from a specific user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A chat user id (platform snowflake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// A chat channel id (platform snowflake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message received from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author: UserId,
    pub channel: ChannelId,
    pub content: String,
}

/// Messaging operations the core needs from the host platform.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Send a text message to a channel.
    async fn send_text(&self, channel: ChannelId, text: &str);

    /// Wait for the next message from `author` in `channel`.
    ///
    /// Returns `None` when `timeout` elapses first. Implementations must
    /// consume at most one message per call and must not buffer replies
    /// across calls.
    async fn next_reply(
        &self,
        channel: ChannelId,
        author: UserId,
        timeout: Duration,
    ) -> Option<IncomingMessage>;
}

//! A stdin/stdout chat host for local sessions.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use rulebot_core::{ChannelId, ChatHost, IncomingMessage, UserId};

/// The single pretend user of a console session.
pub const CONSOLE_USER: UserId = UserId(0);

/// The single pretend channel of a console session.
pub const CONSOLE_CHANNEL: ChannelId = ChannelId(0);

/// Chat host backed by the terminal: replies print to stdout, input
/// lines arrive from a background stdin reader.
pub struct ConsoleChat {
    lines: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsoleChat {
    /// Start the background stdin reader.
    pub fn start() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self {
            lines: Mutex::new(rx),
        }
    }

    /// The next raw console line, or `None` once stdin closes.
    ///
    /// The main loop and in-flight reply waits pull from the same stream,
    /// so a line is consumed by exactly one of them.
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

#[async_trait]
impl ChatHost for ConsoleChat {
    async fn send_text(&self, _channel: ChannelId, text: &str) {
        println!("{text}");
    }

    async fn next_reply(
        &self,
        channel: ChannelId,
        author: UserId,
        timeout: Duration,
    ) -> Option<IncomingMessage> {
        // The timer is dropped the moment a line arrives.
        match tokio::time::timeout(timeout, self.next_line()).await {
            Ok(Some(content)) => Some(IncomingMessage {
                author,
                channel,
                content,
            }),
            Ok(None) | Err(_) => None,
        }
    }
}

//! Disambiguation dialogue for fuzzy lookup results.
//!
//! When a lookup has no exact hit, the ranked candidates are offered to
//! the requester one at a time. Each offer waits for exactly one reply
//! (or a timeout); replies are never buffered across offers.

use std::time::Duration;

use open5e::Record;

use crate::chat::{ChannelId, ChatHost, UserId};
use crate::fuzzy::Ranked;

/// Terminal outcome of a lookup dialogue.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The query matched a record name exactly; no prompting happened.
    Exact(Record),
    /// The requester accepted one of the offered candidates.
    Chosen(Record),
    /// An offer went unanswered for the full reply window.
    TimedOut,
    /// The requester sent a stop token.
    Cancelled,
    /// Every candidate was offered and skipped, or none existed.
    Exhausted,
}

impl Resolution {
    /// The record this dialogue settled on, if any.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Resolution::Exact(record) | Resolution::Chosen(record) => Some(record),
            _ => None,
        }
    }
}

/// What a reply to an offer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Accept,
    Stop,
    Skip,
}

/// Classify a reply against the offer vocabulary.
///
/// Anything outside the vocabulary counts as a skip, the same as an
/// explicit "no".
fn classify(reply: &str) -> Reply {
    match reply.trim().to_lowercase().as_str() {
        "yes" | "y" => Reply::Accept,
        "stop" | "cancel" | "s" => Reply::Stop,
        _ => Reply::Skip,
    }
}

/// Resolve a ranked lookup, prompting the requester as needed.
///
/// An exact match wins immediately. Otherwise candidates are offered in
/// ranked order, each bounded by `reply_timeout` from the moment of the
/// offer.
pub async fn resolve<H: ChatHost + ?Sized>(
    host: &H,
    channel: ChannelId,
    requester: UserId,
    ranked: Ranked,
    reply_timeout: Duration,
) -> Resolution {
    if let Some(exact) = ranked.exact.into_iter().next() {
        return Resolution::Exact(exact);
    }

    if ranked.candidates.is_empty() {
        return Resolution::Exhausted;
    }

    for candidate in ranked.candidates {
        let name = candidate.record.name().unwrap_or("this result");
        host.send_text(
            channel,
            &format!("Did you mean **{name}**? (yes / no / stop)"),
        )
        .await;

        let Some(reply) = host.next_reply(channel, requester, reply_timeout).await else {
            return Resolution::TimedOut;
        };

        match classify(&reply.content) {
            Reply::Accept => return Resolution::Chosen(candidate.record),
            Reply::Stop => return Resolution::Cancelled,
            Reply::Skip => continue,
        }
    }

    Resolution::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::Candidate;
    use crate::testing::{record, MockChat};

    const CHANNEL: ChannelId = ChannelId(10);
    const REQUESTER: UserId = UserId(7);
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn ranked(exact: &[&str], candidates: &[&str]) -> Ranked {
        Ranked {
            exact: exact.iter().map(|n| record(n)).collect(),
            candidates: candidates
                .iter()
                .enumerate()
                .map(|(i, n)| Candidate {
                    record: record(n),
                    score: 90 - i as u8,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn exact_hit_skips_the_prompt() {
        let chat = MockChat::new();
        let outcome = resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&["Fireball"], &["Fire Shield"]),
            TIMEOUT,
        )
        .await;

        assert_eq!(outcome.record().unwrap().name(), Some("Fireball"));
        assert!(matches!(outcome, Resolution::Exact(_)));
        assert!(chat.sent().await.is_empty());
    }

    #[tokio::test]
    async fn no_candidates_is_exhausted_without_prompting() {
        let chat = MockChat::new();
        let outcome = resolve(&chat, CHANNEL, REQUESTER, ranked(&[], &[]), TIMEOUT).await;

        assert!(matches!(outcome, Resolution::Exhausted));
        assert!(chat.sent().await.is_empty());
    }

    #[tokio::test]
    async fn skipping_twice_then_accepting_resolves_the_third() {
        let chat = MockChat::new();
        chat.queue_reply("no").await;
        chat.queue_reply("no").await;
        chat.queue_reply("yes").await;

        let outcome = resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&[], &["First", "Second", "Third"]),
            TIMEOUT,
        )
        .await;

        match outcome {
            Resolution::Chosen(record) => assert_eq!(record.name(), Some("Third")),
            other => panic!("expected Chosen, got {other:?}"),
        }
        assert_eq!(chat.sent().await.len(), 3);
    }

    #[tokio::test]
    async fn stop_on_the_first_offer_cancels() {
        let chat = MockChat::new();
        chat.queue_reply("stop").await;

        let outcome = resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&[], &["First", "Second", "Third"]),
            TIMEOUT,
        )
        .await;

        assert!(matches!(outcome, Resolution::Cancelled));
        // Only the first offer went out.
        assert_eq!(chat.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn unanswered_offer_times_out() {
        let chat = MockChat::new();
        chat.queue_timeout().await;

        let outcome = resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&[], &["First", "Second"]),
            TIMEOUT,
        )
        .await;

        assert!(matches!(outcome, Resolution::TimedOut));
        assert_eq!(chat.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn skipping_every_candidate_exhausts() {
        let chat = MockChat::new();
        chat.queue_reply("n").await;
        chat.queue_reply("nah, the other one").await;

        let outcome = resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&[], &["First", "Second"]),
            TIMEOUT,
        )
        .await;

        assert!(matches!(outcome, Resolution::Exhausted));
        assert_eq!(chat.sent().await.len(), 2);
    }

    #[tokio::test]
    async fn accept_and_stop_tokens_ignore_case_and_whitespace() {
        assert_eq!(classify(" YES "), Reply::Accept);
        assert_eq!(classify("Y"), Reply::Accept);
        assert_eq!(classify("Cancel"), Reply::Stop);
        assert_eq!(classify("S"), Reply::Stop);
        assert_eq!(classify("no"), Reply::Skip);
        assert_eq!(classify("maybe?"), Reply::Skip);
    }

    #[tokio::test]
    async fn offers_follow_ranked_order() {
        let chat = MockChat::new();
        chat.queue_reply("no").await;
        chat.queue_reply("yes").await;

        resolve(
            &chat,
            CHANNEL,
            REQUESTER,
            ranked(&[], &["Alpha", "Beta"]),
            TIMEOUT,
        )
        .await;

        let sent = chat.sent().await;
        assert!(sent[0].contains("Alpha"));
        assert!(sent[1].contains("Beta"));
    }
}

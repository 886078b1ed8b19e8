//! QA tests for complete command flows over the public API.
//!
//! These tests drive the bot exactly the way a front-end does: one
//! inbound message at a time, with scripted collaborator behavior:
//! - Lookup flows (exact hit, disambiguation, skip, stop, timeout)
//! - Character sheet lifecycle (create, delete, update stub)
//! - Error surfaces (transport failure, empty results, bad input)
//!
//! Run with: `cargo test -p rulebot-core --test qa_bot_flow`

use rulebot_core::testing::{record, record_from, MockChat, MockRulesApi};
use rulebot_core::{Bot, BotConfig, ChannelId, CharacterStore, IncomingMessage, UserId};
use serde_json::json;

const PLAYER: UserId = UserId(42);
const TABLE: ChannelId = ChannelId(9);

fn message(text: &str) -> IncomingMessage {
    IncomingMessage {
        author: PLAYER,
        channel: TABLE,
        content: text.to_string(),
    }
}

async fn bot_in(dir: &tempfile::TempDir) -> Bot<MockChat, MockRulesApi> {
    let path = dir.path().join("qa.db");
    let store = CharacterStore::open(path.to_str().unwrap()).await.unwrap();
    Bot::new(MockChat::new(), MockRulesApi::new(), store, BotConfig::new())
}

// =============================================================================
// LOOKUP FLOWS
// =============================================================================

#[tokio::test]
async fn test_exact_hit_formats_without_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api()
        .queue_results(vec![record_from(json!({
            "name": "Grappled",
            "desc": "A grappled creature's speed becomes 0.",
        }))])
        .await;

    bot.handle_message(&message("!condition grappled")).await;

    let sent = bot.host().sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], "Querying condition rules...");
    assert_eq!(
        sent[1],
        "rules for Grappled are: A grappled creature's speed becomes 0."
    );
}

#[tokio::test]
async fn test_skip_skip_accept_resolves_the_third_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    // Three near-misses, no exact hit.
    bot.api()
        .queue_results(vec![
            record("Mage Hand"),
            record("Mage Armor"),
            record("Magic Missile"),
        ])
        .await;
    bot.host().queue_reply("no").await;
    bot.host().queue_reply("no").await;
    bot.host().queue_reply("yes").await;

    bot.handle_message(&message("!spell mage")).await;

    let sent = bot.host().sent().await;
    let offers: Vec<&String> = sent.iter().filter(|m| m.contains("Did you mean")).collect();
    assert_eq!(offers.len(), 3);
    assert!(sent.last().unwrap().starts_with("**Magic Missile**"));
}

#[tokio::test]
async fn test_stop_on_first_offer_cancels_with_no_further_offers() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api()
        .queue_results(vec![record("Mage Hand"), record("Mage Armor")])
        .await;
    bot.host().queue_reply("stop").await;

    bot.handle_message(&message("!spell mage")).await;

    let sent = bot.host().sent().await;
    let offers = sent.iter().filter(|m| m.contains("Did you mean")).count();
    assert_eq!(offers, 1);
    assert_eq!(sent.last().unwrap(), "Lookup cancelled.");
}

#[tokio::test]
async fn test_silence_times_the_lookup_out() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api().queue_results(vec![record("Mage Hand")]).await;
    bot.host().queue_timeout().await;

    bot.handle_message(&message("!spell mage")).await;

    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "No response received. Command cancelled."
    );
}

#[tokio::test]
async fn test_skipping_everything_exhausts_the_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api()
        .queue_results(vec![record("Mage Hand"), record("Mage Armor")])
        .await;
    bot.host().queue_reply("n").await;
    bot.host().queue_reply("nope").await;

    bot.handle_message(&message("!spell mage")).await;

    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "No more matches. Please verify spelling/format and try again."
    );
}

#[tokio::test]
async fn test_weapon_lookup_formats_thrown_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api()
        .queue_results(vec![record_from(json!({
            "name": "Handaxe",
            "damage_dice": "1d6",
            "damage_type": "slashing",
            "properties": ["light", "thrown", "range 20/60"],
        }))])
        .await;

    bot.handle_message(&message("!weapon handaxe")).await;

    let reply = bot.host().last_sent().await.unwrap();
    assert!(reply.contains("Melee Range: 5 ft."));
    assert!(reply.contains("Thrown Range (short): 20 ft."));
    assert!(reply.contains("Thrown Range (long): 60 ft."));
}

// =============================================================================
// ERROR SURFACES
// =============================================================================

#[tokio::test]
async fn test_transport_failure_is_a_retry_later_message() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api()
        .queue_error(open5e::Error::Network("connection refused".to_string()))
        .await;

    bot.handle_message(&message("!spell fireball")).await;

    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "Something went wrong. Please try again in a few moments."
    );
}

#[tokio::test]
async fn test_zero_records_is_a_distinct_message() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.api().queue_results(Vec::new()).await;
    bot.handle_message(&message("!spell xyzzy")).await;

    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "No results found. Please verify spelling/format and try again."
    );
}

#[tokio::test]
async fn test_bad_dice_notation_keeps_the_session_alive() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.handle_message(&message("!roll 6d")).await;
    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "Something went wrong. Please verify format. (ex. 4D20, 6D6)"
    );

    // The next command still works.
    bot.handle_message(&message("!ping")).await;
    assert_eq!(bot.host().last_sent().await.unwrap(), "pong");
}

// =============================================================================
// CHARACTER LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_character_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    // Create: class is validated before the stats prompt.
    bot.host().queue_reply("5 15 14 13 12 10 8").await;
    bot.handle_message(&message("!character create Elara wizard"))
        .await;
    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "Saved Elara, level 5 Wizard."
    );

    let sheet = bot.store().get(PLAYER, "Elara").await.unwrap().unwrap();
    assert_eq!(sheet.level, 5);
    assert_eq!(sheet.abilities.strength, 15);

    // Update is an honest stub.
    bot.handle_message(&message("!character update Elara level 6"))
        .await;
    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "Character update isn't supported yet."
    );
    assert_eq!(
        bot.store().get(PLAYER, "Elara").await.unwrap().unwrap().level,
        5
    );

    // Delete reports removal, then absence.
    bot.handle_message(&message("!character delete Elara")).await;
    assert_eq!(bot.host().last_sent().await.unwrap(), "Deleted Elara.");
    assert!(bot.store().get(PLAYER, "Elara").await.unwrap().is_none());

    bot.handle_message(&message("!character delete Elara")).await;
    assert_eq!(
        bot.host().last_sent().await.unwrap(),
        "No character named Elara found."
    );
}

#[tokio::test]
async fn test_character_create_bad_stats_does_not_persist() {
    let dir = tempfile::tempdir().unwrap();
    let bot = bot_in(&dir).await;

    bot.host().queue_reply("not numbers at all").await;
    bot.handle_message(&message("!character create Pippin bard"))
        .await;

    assert!(bot.store().get(PLAYER, "Pippin").await.unwrap().is_none());

    // A corrected second attempt succeeds from scratch.
    bot.host().queue_reply("1 8 14 12 13 10 15").await;
    bot.handle_message(&message("!character create Pippin bard"))
        .await;
    assert!(bot.store().get(PLAYER, "Pippin").await.unwrap().is_some());
}

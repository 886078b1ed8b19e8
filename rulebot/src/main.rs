//! Console front-end for the rules lookup bot.
//!
//! Reads commands from stdin and prints replies to stdout, standing in
//! for a chat platform during local use and manual testing:
//!
//! ```bash
//! cargo run -p rulebot
//! !roll 4d6
//! !spell fireball
//! ```

mod console;
mod logging;

use console::{ConsoleChat, CONSOLE_CHANNEL, CONSOLE_USER};
use rulebot_core::{Bot, BotConfig, CharacterStore, IncomingMessage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    logging::init(verbose);

    let config = BotConfig::from_env();
    let prefix = config.command_prefix.clone();

    let store = CharacterStore::open(&config.db_path).await?;
    let api = match &config.api_base_url {
        Some(url) => open5e::Client::new().with_base_url(url.clone()),
        None => open5e::Client::new(),
    };

    tracing::info!(db = %config.db_path, "rulebot ready");
    println!("rulebot ready. Try {prefix}roll 2d6 or {prefix}spell fireball. Ctrl-D quits.");

    let bot = Bot::new(ConsoleChat::start(), api, store, config);

    loop {
        let Some(line) = bot.host().next_line().await else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let message = IncomingMessage {
            author: CONSOLE_USER,
            channel: CONSOLE_CHANNEL,
            content: line,
        };
        bot.handle_message(&message).await;
    }

    Ok(())
}

fn print_help() {
    println!("rulebot - tabletop rules lookup bot (console mode)");
    println!();
    println!("Usage: rulebot [--verbose]");
    println!();
    println!("Commands (default prefix '!'):");
    println!("  !ping                              liveness check");
    println!("  !roll <NdM>                        roll dice, e.g. !roll 4d6");
    println!("  !spell <name>                      look up a spell");
    println!("  !condition <name>                  look up a condition");
    println!("  !weapon <name>                     look up a weapon");
    println!("  !character create <name> <class>   save a character sheet");
    println!("  !character delete <name>           delete a character sheet");
    println!();
    println!("Environment: OPEN5E_URL overrides the rules API base URL,");
    println!("RULEBOT_DB sets the character database path (.env is honored).");
}

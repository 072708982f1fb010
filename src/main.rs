//! Doorman - Telegram group housekeeping bot
//!
//! Deletes the service messages Telegram posts when members join or leave
//! a group, and answers `/start` so operators can check the bot is alive.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `events` - Update model and classification
//! - `plugins` - Command recognition
//! - `bot` - Outbound actions, webhook gateway, polling dispatcher
//! - `error` - Error types

mod bot;
mod config;
mod error;
mod events;
mod plugins;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bot::{TelegramActions, UpdateProcessor};
use config::Config;
use events::UpdateClassifier;
use plugins::Command;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("doorman=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Doorman bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    // Throttle respects Telegram's per-chat and global send limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let bot_username = match config.bot_username.clone() {
        Some(username) => username,
        None => bot.get_me().await?.username().to_string(),
    };
    info!("Using bot username: @{}", bot_username);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let processor = UpdateProcessor::new(
        UpdateClassifier::new(Some(bot_username)),
        Arc::new(TelegramActions::new(bot.clone())),
    );

    bot::run(&config, bot, processor).await
}

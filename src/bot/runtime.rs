//! Bot runtime - Polling and Webhook runners.

use tracing::info;

use super::ThrottledBot;
use super::actions::UpdateProcessor;
use super::dispatcher::build_dispatcher;
use super::webhook::start_webhook;
use crate::config::{BotMode, Config};

/// Run the bot with the configured mode.
///
/// Both modes feed the same processor.
pub async fn run(
    config: &Config,
    bot: ThrottledBot,
    processor: UpdateProcessor,
) -> anyhow::Result<()> {
    match (config.bot_mode, config.webhook.as_ref()) {
        (BotMode::Webhook, Some(webhook)) => {
            info!("Starting bot in webhook mode...");
            start_webhook(webhook, bot, processor).await
        }
        (BotMode::Webhook, None) => {
            anyhow::bail!("webhook mode selected without webhook configuration")
        }
        (BotMode::Polling, _) => {
            info!("Starting bot in polling mode...");
            build_dispatcher(bot, processor).dispatch().await;
            Ok(())
        }
    }
}

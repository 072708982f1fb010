//! Command plugins.
//!
//! Commands are only recognised here; replies are executed by the update
//! processor like every other decision.

pub mod start;

use teloxide::utils::command::BotCommands;

pub use start::{START_REPLY, is_start_command};

/// All bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Check that the bot is running")]
    Start,
}

//! /start command plugin.
//!
//! Lets operators check that the bot is alive in a chat.

use teloxide::utils::command::BotCommands;

use super::Command;

/// Reply sent for `/start`.
pub const START_REPLY: &str = "Bot is running";

/// Check whether `text` is exactly the `/start` command.
///
/// An `@username` suffix is accepted only when it names this bot. Arguments,
/// surrounding whitespace and other casing are not.
pub fn is_start_command(text: &str, bot_username: Option<&str>) -> bool {
    if text.trim() != text {
        return false;
    }

    matches!(
        Command::parse(text, bot_username.unwrap_or_default()),
        Ok(Command::Start)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_start() {
        assert!(is_start_command("/start", None));
        assert!(is_start_command("/start", Some("doorman_bot")));
    }

    #[test]
    fn test_start_with_own_username() {
        assert!(is_start_command("/start@doorman_bot", Some("doorman_bot")));
    }

    #[test]
    fn test_start_addressed_elsewhere() {
        assert!(!is_start_command("/start@other_bot", Some("doorman_bot")));
        assert!(!is_start_command("/start@doorman_bot", None));
    }

    #[test]
    fn test_not_start() {
        assert!(!is_start_command("/start now", None));
        assert!(!is_start_command(" /start", None));
        assert!(!is_start_command("/start ", None));
        assert!(!is_start_command("/START", None));
        assert!(!is_start_command("/help", None));
        assert!(!is_start_command("start", None));
        assert!(!is_start_command("", None));
    }
}

//! Update classification.
//!
//! Maps an inbound update to the single action the bot takes for it:
//! - service messages announcing membership changes are deleted
//! - `/start` gets a liveness reply
//! - everything else is ignored

pub mod membership;
pub mod update;

pub use membership::MembershipChange;
pub use update::Update;

use crate::plugins::{START_REPLY, is_start_command};

/// What to do with an update. Derived per update, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDecision {
    Delete {
        chat_id: i64,
        message_id: i64,
        change: MembershipChange,
    },
    Reply { chat_id: i64, text: String },
    Ignore,
}

/// Pure, stateless update classifier.
#[derive(Debug, Clone, Default)]
pub struct UpdateClassifier {
    /// Bot username (without @) accepted in `/start@name`.
    bot_username: Option<String>,
}

impl UpdateClassifier {
    pub fn new(bot_username: Option<String>) -> Self {
        Self { bot_username }
    }

    /// Decide what to do with an update.
    ///
    /// Membership markers are checked before commands, so an update is never
    /// both deleted and answered.
    pub fn classify(&self, update: &Update) -> ActionDecision {
        let Some(msg) = update.message.as_ref() else {
            return ActionDecision::Ignore;
        };
        let Some(chat_id) = msg.chat_id() else {
            return ActionDecision::Ignore;
        };

        if let Some(change) = membership::detect(msg) {
            return match msg.message_id {
                Some(message_id) => ActionDecision::Delete {
                    chat_id,
                    message_id,
                    change,
                },
                None => ActionDecision::Ignore,
            };
        }

        match msg.text.as_deref() {
            Some(text) if is_start_command(text, self.bot_username.as_deref()) => {
                ActionDecision::Reply {
                    chat_id,
                    text: START_REPLY.to_string(),
                }
            }
            _ => ActionDecision::Ignore,
        }
    }
}

//! Outbound actions and the update processor.
//!
//! `UpdateProcessor` is shared by the webhook gateway and the polling
//! dispatcher. It classifies an update, performs at most one Telegram call,
//! and never lets a downstream failure escape: Telegram redelivers updates
//! that are not acknowledged, so failures are logged and swallowed here.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};
use tracing::{debug, error, info, warn};

use super::ThrottledBot;
use crate::error::ActionError;
use crate::events::{ActionDecision, Update, UpdateClassifier};

/// The Telegram calls a decision can turn into.
#[async_trait]
pub trait ChatActions: Send + Sync {
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ActionError>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ActionError>;
}

/// `ChatActions` backed by the rate-limited teloxide bot.
#[derive(Clone)]
pub struct TelegramActions {
    bot: ThrottledBot,
}

impl TelegramActions {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatActions for TelegramActions {
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ActionError> {
        let id = i32::try_from(message_id)
            .map_err(|_| ActionError::MessageIdOutOfRange(message_id))?;
        self.bot.delete_message(ChatId(chat_id), MessageId(id)).await?;
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ActionError> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}

/// Result of executing one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Deleted,
    Replied,
    Skipped,
    Failed,
}

/// Classifies updates and executes the resulting decision.
#[derive(Clone)]
pub struct UpdateProcessor {
    classifier: UpdateClassifier,
    actions: Arc<dyn ChatActions>,
}

impl UpdateProcessor {
    pub fn new(classifier: UpdateClassifier, actions: Arc<dyn ChatActions>) -> Self {
        Self { classifier, actions }
    }

    /// Process one update. Never fails.
    pub async fn process(&self, update: &Update) -> ActionOutcome {
        let decision = self.classifier.classify(update);
        debug!("Update {:?} classified as {:?}", update.update_id, decision);

        self.execute(decision).await
    }

    /// Execute a decision with at most one outbound call.
    pub async fn execute(&self, decision: ActionDecision) -> ActionOutcome {
        match decision {
            ActionDecision::Delete {
                chat_id,
                message_id,
                change,
            } => {
                match self.actions.delete_message(chat_id, message_id).await {
                    Ok(()) => {
                        info!(
                            "Deleted service message {} ({:?}) from chat {}",
                            message_id, change, chat_id
                        );
                        ActionOutcome::Deleted
                    }
                    Err(e) => {
                        log_failure("deleteMessage", chat_id, &e);
                        ActionOutcome::Failed
                    }
                }
            }
            ActionDecision::Reply { chat_id, text } => {
                match self.actions.send_message(chat_id, &text).await {
                    Ok(()) => {
                        info!("Replied to /start in chat {}", chat_id);
                        ActionOutcome::Replied
                    }
                    Err(e) => {
                        log_failure("sendMessage", chat_id, &e);
                        ActionOutcome::Failed
                    }
                }
            }
            ActionDecision::Ignore => ActionOutcome::Skipped,
        }
    }
}

fn log_failure(method: &str, chat_id: i64, err: &ActionError) {
    if err.is_benign() {
        warn!("{} in chat {} had no effect: {}", method, chat_id, err);
    } else {
        error!("{} in chat {} failed: {}", method, chat_id, err);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use teloxide::{ApiError, RequestError};

    use super::*;

    /// A Telegram call recorded by `RecordingActions`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Delete(i64, i64),
        Send(i64, String),
    }

    /// Records calls instead of talking to Telegram.
    #[derive(Default)]
    pub struct RecordingActions {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    impl RecordingActions {
        /// Every call is recorded and then fails with a permission error.
        pub fn failing() -> Self {
            Self {
                calls: Mutex::default(),
                fail: true,
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), ActionError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(RequestError::Api(ApiError::NotEnoughRightsToPostMessages).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ChatActions for RecordingActions {
        async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ActionError> {
            self.record(Call::Delete(chat_id, message_id))
        }

        async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ActionError> {
            self.record(Call::Send(chat_id, text.to_string()))
        }
    }
}

//! Error types.
//!
//! Configuration errors abort startup. Action errors never leave the
//! update processor; they are logged and the update is still acknowledged.

use teloxide::{ApiError, RequestError};

/// Invalid or missing configuration. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be set when BOT_MODE is webhook")]
    MissingForWebhook { name: &'static str },

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Failure while executing a decision against the Telegram API.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("message id {0} does not fit a Telegram message id")]
    MessageIdOutOfRange(i64),

    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
}

impl ActionError {
    /// Failures that are expected during normal operation, e.g. another
    /// admin (or another bot) already removed the service message.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Self::Request(RequestError::Api(
                ApiError::MessageToDeleteNotFound | ApiError::MessageCantBeDeleted
            ))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_is_benign() {
        let err = ActionError::from(RequestError::Api(ApiError::MessageToDeleteNotFound));
        assert!(err.is_benign());

        let err = ActionError::from(RequestError::Api(ApiError::MessageCantBeDeleted));
        assert!(err.is_benign());
    }

    #[test]
    fn test_other_failures_are_not_benign() {
        let err = ActionError::from(RequestError::Api(ApiError::BotKicked));
        assert!(!err.is_benign());

        assert!(!ActionError::MessageIdOutOfRange(i64::MAX).is_benign());
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::Missing("BOT_TOKEN").to_string(), "BOT_TOKEN must be set");
        assert_eq!(
            ConfigError::MissingForWebhook { name: "WEBHOOK_URL" }.to_string(),
            "WEBHOOK_URL must be set when BOT_MODE is webhook"
        );
    }
}

//! Inbound update model.
//!
//! Only the handful of fields the classifier reads are modelled. Every field
//! is optional and decoded leniently: a field with an unexpected shape is
//! treated as if it were absent, so a malformed optional field can never
//! reject an otherwise valid update.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use teloxide::types::Message;

/// A single update delivered by Telegram.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Update {
    #[serde(default, deserialize_with = "lenient")]
    pub update_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<IncomingMessage>,
}

/// The `message` part of an update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncomingMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub message_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub chat: Option<ChatRef>,

    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,

    // Membership markers are kept raw; `membership` decides what counts as set.
    #[serde(default)]
    pub new_chat_members: Option<Value>,
    #[serde(default)]
    pub left_chat_member: Option<Value>,
    #[serde(default)]
    pub group_chat_created: Option<Value>,
    #[serde(default)]
    pub supergroup_chat_created: Option<Value>,
    #[serde(default)]
    pub migrate_to_chat_id: Option<Value>,
    #[serde(default)]
    pub migrate_from_chat_id: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

impl IncomingMessage {
    pub fn chat_id(&self) -> Option<i64> {
        self.chat.map(|c| c.id)
    }
}

impl Update {
    /// Build an update from a message received through long polling.
    ///
    /// The message is re-encoded into the Bot API wire format and decoded
    /// with the same lenient rules as a webhook body.
    pub fn from_message(update_id: Option<i64>, msg: &Message) -> serde_json::Result<Self> {
        let message = serde_json::from_value(serde_json::to_value(msg)?)?;
        Ok(Self {
            update_id,
            message: Some(message),
        })
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

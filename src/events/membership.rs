//! Membership-change detection.
//!
//! Telegram signals membership churn through several message-level fields,
//! not only `new_chat_members` / `left_chat_member`. Group creation and
//! chat migration notices are housekeeping noise of the same kind.

use serde_json::Value;

use super::update::IncomingMessage;

/// Which membership marker a service message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    MembersJoined(usize),
    MemberLeft,
    GroupCreated,
    SupergroupCreated,
    MigratedTo,
    MigratedFrom,
}

/// Return the first membership marker set on the message, if any.
pub fn detect(msg: &IncomingMessage) -> Option<MembershipChange> {
    if let Some(Value::Array(members)) = &msg.new_chat_members {
        if !members.is_empty() {
            return Some(MembershipChange::MembersJoined(members.len()));
        }
    }

    if is_present(&msg.left_chat_member) {
        return Some(MembershipChange::MemberLeft);
    }

    if is_truthy(&msg.group_chat_created) {
        return Some(MembershipChange::GroupCreated);
    }

    if is_truthy(&msg.supergroup_chat_created) {
        return Some(MembershipChange::SupergroupCreated);
    }

    if is_present(&msg.migrate_to_chat_id) {
        return Some(MembershipChange::MigratedTo);
    }

    if is_present(&msg.migrate_from_chat_id) {
        return Some(MembershipChange::MigratedFrom);
    }

    None
}

#[inline]
fn is_present(field: &Option<Value>) -> bool {
    !matches!(field, None | Some(Value::Null))
}

fn is_truthy(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(value: Value) -> IncomingMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_message_has_no_marker() {
        let msg = message(json!({"chat": {"id": 1}, "message_id": 2, "text": "hi"}));
        assert_eq!(detect(&msg), None);
    }

    #[test]
    fn test_joined_counts_members() {
        let msg = message(json!({"new_chat_members": [{"id": 1}, {"id": 2}]}));
        assert_eq!(detect(&msg), Some(MembershipChange::MembersJoined(2)));
    }

    #[test]
    fn test_empty_or_malformed_join_list_is_not_a_marker() {
        assert_eq!(detect(&message(json!({"new_chat_members": []}))), None);
        assert_eq!(detect(&message(json!({"new_chat_members": null}))), None);
        assert_eq!(detect(&message(json!({"new_chat_members": "x"}))), None);
    }

    #[test]
    fn test_left_member_any_non_null() {
        let msg = message(json!({"left_chat_member": {"id": 7}}));
        assert_eq!(detect(&msg), Some(MembershipChange::MemberLeft));

        let msg = message(json!({"left_chat_member": 7}));
        assert_eq!(detect(&msg), Some(MembershipChange::MemberLeft));

        assert_eq!(detect(&message(json!({"left_chat_member": null}))), None);
    }

    #[test]
    fn test_creation_flags_must_be_truthy() {
        let msg = message(json!({"group_chat_created": true}));
        assert_eq!(detect(&msg), Some(MembershipChange::GroupCreated));

        let msg = message(json!({"supergroup_chat_created": true}));
        assert_eq!(detect(&msg), Some(MembershipChange::SupergroupCreated));

        assert_eq!(detect(&message(json!({"group_chat_created": false}))), None);
        assert_eq!(detect(&message(json!({"supergroup_chat_created": 0}))), None);
    }

    #[test]
    fn test_migration_fields() {
        let msg = message(json!({"migrate_to_chat_id": -1001}));
        assert_eq!(detect(&msg), Some(MembershipChange::MigratedTo));

        let msg = message(json!({"migrate_from_chat_id": -5}));
        assert_eq!(detect(&msg), Some(MembershipChange::MigratedFrom));
    }
}

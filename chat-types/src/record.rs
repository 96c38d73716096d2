//! The message record and its persisted field contract.

use serde::{Deserialize, Serialize};

use crate::{MessageId, ParticipantId};

/// A single message in a conversation log.
///
/// Wire field names follow the persisted document contract
/// (`messageId`, `senderId`, `receiverId`, `message`, `timestamp`, `read`)
/// so records round-trip against existing backends unchanged. Everything
/// except the `read` flag is immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Unique, immutable message identifier
    pub message_id: MessageId,
    /// The authoring participant
    pub sender_id: ParticipantId,
    /// The other participant
    pub receiver_id: ParticipantId,
    /// Message text, non-empty after trimming
    #[serde(rename = "message")]
    pub body: String,
    /// Creation time in milliseconds since the Unix epoch; the sole sort key
    #[serde(rename = "timestamp")]
    pub created_at: i64,
    /// Whether the receiver has seen the message
    #[serde(default)]
    pub read: bool,
}

impl MessageRecord {
    /// Create a record. The `read` flag starts false.
    pub fn new(
        message_id: MessageId,
        sender_id: ParticipantId,
        receiver_id: ParticipantId,
        body: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            message_id,
            sender_id,
            receiver_id,
            body: body.into(),
            created_at,
            read: false,
        }
    }

    /// Ordering key: creation time, ties broken by message id.
    pub fn sort_key(&self) -> (i64, MessageId) {
        (self.created_at, self.message_id)
    }

    /// Which side of the conversation this record sits on for `viewer`.
    pub fn direction(&self, viewer: &ParticipantId) -> Direction {
        if &self.sender_id == viewer {
            Direction::Sent
        } else {
            Direction::Received
        }
    }
}

/// Which side of the conversation a record belongs to, from one
/// participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The viewer authored the message
    Sent,
    /// The peer authored the message
    Received,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s).unwrap()
    }

    fn make_record(body: &str, created_at: i64) -> MessageRecord {
        MessageRecord::new(MessageId::new(), pid("u1"), pid("u2"), body, created_at)
    }

    #[test]
    fn new_record_is_unread() {
        let record = make_record("hi", 100);
        assert!(!record.read);
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let record = make_record("hi", 100);
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        for field in ["messageId", "senderId", "receiverId", "message", "timestamp", "read"] {
            assert!(obj.contains_key(field), "missing field: {field}");
        }
        assert_eq!(obj["message"], "hi");
        assert_eq!(obj["timestamp"], 100);
        assert_eq!(obj["read"], false);
    }

    #[test]
    fn deserializes_missing_read_as_false() {
        let id = MessageId::new();
        let json = format!(
            r#"{{"messageId":"{id}","senderId":"u1","receiverId":"u2","message":"hi","timestamp":100}}"#
        );
        let record: MessageRecord = serde_json::from_str(&json).unwrap();
        assert!(!record.read);
        assert_eq!(record.body, "hi");
        assert_eq!(record.created_at, 100);
    }

    #[test]
    fn direction_is_sent_for_author() {
        let record = make_record("hi", 100);
        assert_eq!(record.direction(&pid("u1")), Direction::Sent);
        assert_eq!(record.direction(&pid("u2")), Direction::Received);
    }

    #[test]
    fn sort_key_orders_by_time_then_id() {
        let early = MessageId::from_uuid(uuid::Uuid::from_u128(1));
        let late = MessageId::from_uuid(uuid::Uuid::from_u128(2));
        let a = MessageRecord::new(late, pid("u1"), pid("u2"), "a", 100);
        let b = MessageRecord::new(early, pid("u1"), pid("u2"), "b", 200);
        let c = MessageRecord::new(early, pid("u1"), pid("u2"), "c", 100);
        assert!(a.sort_key() < b.sort_key()); // time dominates
        assert!(c.sort_key() < a.sort_key()); // id breaks the tie
    }
}

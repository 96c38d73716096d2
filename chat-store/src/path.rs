//! Logical document paths for the message log.
//!
//! A remote backend persists the log under
//! `conversations/{conversationKey}/messages/{messageId}`. These helpers
//! build those paths for storage layers and trace output.

use chat_types::{ConversationKey, MessageId};

/// Path of the conversation document for `key`.
pub fn conversation_path(key: &ConversationKey) -> String {
    format!("conversations/{key}")
}

/// Path of one message document inside a conversation.
pub fn message_path(key: &ConversationKey, id: &MessageId) -> String {
    format!("{}/messages/{}", conversation_path(key), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_types::ParticipantId;

    fn key() -> ConversationKey {
        let a = ParticipantId::new("u1").unwrap();
        let b = ParticipantId::new("u2").unwrap();
        ConversationKey::between(&a, &b).unwrap()
    }

    #[test]
    fn conversation_path_shape() {
        assert_eq!(conversation_path(&key()), "conversations/u1_u2");
    }

    #[test]
    fn message_path_shape() {
        let id = MessageId::from_uuid(uuid::Uuid::from_u128(7));
        assert_eq!(
            message_path(&key(), &id),
            format!("conversations/u1_u2/messages/{id}")
        );
    }
}

//! Identity types for pairchat.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidParticipants;

/// Separator between the two participant ids in a conversation key.
const KEY_SEPARATOR: char = '_';

/// An identifier for one conversation participant.
///
/// Issued by the identity layer and treated as an opaque string here.
/// The underscore is reserved as the conversation key separator, so ids
/// containing one are rejected at construction rather than escaped.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a ParticipantId from a raw identity string.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidParticipants> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidParticipants::Empty);
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(InvalidParticipants::ReservedSeparator { id });
        }
        Ok(Self(id))
    }

    /// Get the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({})", self.0)
    }
}

/// The canonical identifier for a two-party conversation.
///
/// Derived from the participant pair, never minted: both sides compute
/// the same key regardless of argument order, so no allocation step or
/// coordination is needed to open a conversation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConversationKey(String);

impl ConversationKey {
    /// Derive the canonical key for a pair of participants.
    ///
    /// The lexicographically smaller id comes first, joined with `_`:
    /// `between(u2, u1)` and `between(u1, u2)` both yield `u1_u2`.
    /// A participant cannot converse with itself.
    pub fn between(a: &ParticipantId, b: &ParticipantId) -> Result<Self, InvalidParticipants> {
        if a == b {
            return Err(InvalidParticipants::Identical {
                id: a.as_str().to_string(),
            });
        }
        let (first, second) = if a.as_str() < b.as_str() { (a, b) } else { (b, a) };
        Ok(Self(format!(
            "{}{}{}",
            first.as_str(),
            KEY_SEPARATOR,
            second.as_str()
        )))
    }

    /// Get the canonical key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversationKey({})", self.0)
    }
}

/// A unique identifier for a message.
///
/// UUID v4 format (16 bytes). The derived `Ord` follows uuid byte order,
/// which matches the lexical order of the canonical string form, so the
/// id doubles as the deterministic ordering tie-break.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(uuid::Uuid);

impl MessageId {
    /// Create a new random MessageId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create a MessageId from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s).unwrap()
    }

    #[test]
    fn participant_id_display_is_raw() {
        let id = pid("u1");
        assert_eq!(id.to_string(), "u1");
        assert_eq!(id.as_str(), "u1");
    }

    #[test]
    fn participant_id_rejects_empty() {
        let err = ParticipantId::new("").unwrap_err();
        assert!(matches!(err, InvalidParticipants::Empty));
    }

    #[test]
    fn participant_id_rejects_separator() {
        let err = ParticipantId::new("u_1").unwrap_err();
        assert!(matches!(err, InvalidParticipants::ReservedSeparator { .. }));
    }

    #[test]
    fn key_orders_lexicographically() {
        let key = ConversationKey::between(&pid("u1"), &pid("u2")).unwrap();
        assert_eq!(key.as_str(), "u1_u2");
    }

    #[test]
    fn key_is_commutative() {
        let forward = ConversationKey::between(&pid("u1"), &pid("u2")).unwrap();
        let reversed = ConversationKey::between(&pid("u2"), &pid("u1")).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(reversed.as_str(), "u1_u2");
    }

    #[test]
    fn key_identical_participants_fails() {
        let err = ConversationKey::between(&pid("u1"), &pid("u1")).unwrap_err();
        assert!(matches!(err, InvalidParticipants::Identical { .. }));
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let key = ConversationKey::between(&pid("u1"), &pid("u2")).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"u1_u2\"");
    }

    #[test]
    fn message_id_is_uuid_v4() {
        let id = MessageId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn message_id_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    #[test]
    fn message_id_ord_matches_string_order() {
        let a = MessageId::from_uuid(uuid::Uuid::from_u128(1));
        let b = MessageId::from_uuid(uuid::Uuid::from_u128(2));
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }
}

//! Pair validation errors for pairchat.

use thiserror::Error;

/// Errors raised when a participant pair cannot form a conversation.
///
/// All variants are detected synchronously, before any store I/O, and
/// are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidParticipants {
    /// A participant id was empty
    #[error("participant id is empty")]
    Empty,

    /// Both sides of the pair carried the same id
    #[error("participants are identical: {id}")]
    Identical {
        /// The duplicated id
        id: String,
    },

    /// The id contains the reserved conversation key separator
    #[error("participant id contains reserved separator '_': {id}")]
    ReservedSeparator {
        /// The offending id
        id: String,
    },
}

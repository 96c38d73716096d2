//! Error types for chat-store.

use chat_types::MessageId;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not persist the record durably.
    #[error("write failed: {reason}")]
    WriteFailed {
        /// Backend-supplied description of the failure.
        reason: String,
    },

    /// A record with this id already exists; appends never overwrite.
    #[error("duplicate message id: {id}")]
    DuplicateMessageId {
        /// The id that was already present.
        id: MessageId,
    },

    /// The live feed could not be opened.
    #[error("subscribe failed: {reason}")]
    SubscribeFailed {
        /// Backend-supplied description of the failure.
        reason: String,
    },
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

//! # chat-store
//!
//! Message log storage for pairchat: the [`MessageStore`] contract plus an
//! in-memory reference backend with live change feeds.
//!
//! A store owns the per-conversation append-only log. Consumers append
//! records and subscribe to a feed of [`FeedEvent`]s; a new feed replays
//! the current log as `Added` events, then streams every later change.
//! Ordering of the materialized view is the subscriber's job (see
//! `chat-core`); the store guarantees only that each accepted change
//! reaches every live feed once.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod feed;
mod memory;
mod path;

pub use error::{StoreError, StoreResult};
pub use feed::{FeedEvent, Subscription, SubscriptionHandle};
pub use memory::MemoryStore;
pub use path::{conversation_path, message_path};

use async_trait::async_trait;
use chat_types::{ConversationKey, MessageId, MessageRecord};

/// Trait for conversation message stores.
///
/// Implementations persist message records per conversation and expose a
/// live feed of changes. Appends are atomic per record: the record is
/// either durably recorded under its unique id or the append fails. An
/// existing id is never silently overwritten.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append `record` to the conversation log under its message id.
    ///
    /// Returns the id on success. Fails with
    /// [`StoreError::DuplicateMessageId`] when the id is already present,
    /// or [`StoreError::WriteFailed`] when the backend cannot persist the
    /// record. No retries happen at this layer.
    async fn append(
        &self,
        key: &ConversationKey,
        record: MessageRecord,
    ) -> StoreResult<MessageId>;

    /// Open a live feed over the conversation log.
    ///
    /// The current log is replayed as `Added` events in ascending
    /// `(created_at, message_id)` order, then each subsequent change is
    /// delivered as it happens.
    async fn subscribe(&self, key: &ConversationKey) -> StoreResult<Subscription>;

    /// Tear down a live feed.
    ///
    /// Idempotent: unknown or already-removed handles are a no-op.
    async fn unsubscribe(&self, handle: &SubscriptionHandle);
}

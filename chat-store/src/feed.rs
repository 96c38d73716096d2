//! Live feed plumbing for conversation subscriptions.

use chat_types::{ChangeEvent, ConversationKey};
use tokio::sync::mpsc;

/// Identifies one live subscription on a store.
///
/// Returned inside a [`Subscription`]; pass it back to the store's
/// `unsubscribe` to tear the feed down. Cloneable so the owner can keep a
/// copy for teardown while the feed is consumed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    key: ConversationKey,
    subscriber_id: u64,
}

impl SubscriptionHandle {
    /// Create a handle for a store-assigned subscriber on `key`.
    pub fn new(key: ConversationKey, subscriber_id: u64) -> Self {
        Self { key, subscriber_id }
    }

    /// The conversation this subscription watches.
    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    /// The store-assigned subscriber id.
    pub fn subscriber_id(&self) -> u64 {
        self.subscriber_id
    }
}

/// One event on a live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// An incremental change to the conversation log.
    Change(ChangeEvent),
    /// The feed broke; no further events will arrive on it.
    Failed {
        /// Backend-supplied description of the failure.
        reason: String,
    },
}

/// A live feed over one conversation.
///
/// The current log arrives first as `Added` events in display order, then
/// each subsequent change as it happens. Dropping the receiver ends
/// delivery; `unsubscribe` releases the store side eagerly.
#[derive(Debug)]
pub struct Subscription {
    /// Handle for tearing the subscription down.
    pub handle: SubscriptionHandle,
    /// The event feed; closes when the subscription is torn down.
    pub events: mpsc::UnboundedReceiver<FeedEvent>,
}

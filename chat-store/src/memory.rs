//! In-memory message store with live feeds.
//!
//! The reference [`MessageStore`] backend. Conversations are created
//! implicitly on first append or subscribe and retained without bound.
//! Every accepted change fans out to all live subscribers of the
//! conversation; subscribers whose receiver is gone are pruned on the
//! next delivery.
//!
//! Failure injection hooks (`fail_next_*`, `break_feed`) and call
//! counters make this backend double as the test harness for everything
//! built on the store contract.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use chat_types::{ChangeEvent, ConversationKey, MessageId, MessageRecord};

use crate::path::{conversation_path, message_path};
use crate::{FeedEvent, MessageStore, StoreError, StoreResult, Subscription, SubscriptionHandle};

/// One live subscriber of a conversation log.
#[derive(Debug)]
struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<FeedEvent>,
}

/// The log and subscriber list for one conversation.
#[derive(Debug, Default)]
struct ConversationLog {
    records: HashMap<MessageId, MessageRecord>,
    subscribers: Vec<Subscriber>,
}

impl ConversationLog {
    /// Deliver `event` to every live subscriber, pruning dead ones.
    fn broadcast(&mut self, event: ChangeEvent) {
        self.subscribers.retain(|sub| {
            let delivered = sub.sender.send(FeedEvent::Change(event.clone())).is_ok();
            if !delivered {
                tracing::debug!("pruning dead subscriber {}", sub.id);
            }
            delivered
        });
    }
}

/// Forced failures for the next store calls.
#[derive(Debug, Default)]
struct Faults {
    next_append: Option<String>,
    next_subscribes: VecDeque<String>,
}

/// In-memory conversation store.
///
/// Thread-safe and cheap to clone; clones share the same logs and
/// subscribers. Not persistent - all data is lost when the last clone is
/// dropped.
#[derive(Default, Clone)]
pub struct MemoryStore {
    conversations: Arc<DashMap<ConversationKey, ConversationLog>>,
    next_subscriber_id: Arc<AtomicU64>,
    append_calls: Arc<AtomicU64>,
    faults: Arc<Mutex<Faults>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the `read` flag of a message and notify subscribers.
    ///
    /// The one in-place mutation the backend supports. Emits a `Modified`
    /// event on the first transition only; marking an already-read record
    /// changes nothing. Returns `Ok(false)` when the conversation or
    /// message is unknown.
    pub async fn mark_read(
        &self,
        key: &ConversationKey,
        id: &MessageId,
    ) -> StoreResult<bool> {
        let Some(mut log) = self.conversations.get_mut(key) else {
            return Ok(false);
        };
        let updated = {
            let Some(record) = log.records.get_mut(id) else {
                return Ok(false);
            };
            if record.read {
                return Ok(true);
            }
            record.read = true;
            record.clone()
        };
        tracing::debug!("marked read {}", message_path(key, id));
        log.broadcast(ChangeEvent::modified(updated));
        Ok(true)
    }

    /// Delete a message from the log and notify subscribers.
    ///
    /// Emits a `Removed` event carrying the record's last state. Returns
    /// `Ok(false)` when the conversation or message is unknown.
    pub async fn remove(&self, key: &ConversationKey, id: &MessageId) -> StoreResult<bool> {
        let Some(mut log) = self.conversations.get_mut(key) else {
            return Ok(false);
        };
        let Some(record) = log.records.remove(id) else {
            return Ok(false);
        };
        tracing::debug!("removed {}", message_path(key, id));
        log.broadcast(ChangeEvent::removed(record));
        Ok(true)
    }

    /// Snapshot of a conversation's records in display order.
    pub fn records(&self, key: &ConversationKey) -> Vec<MessageRecord> {
        let mut records: Vec<MessageRecord> = self
            .conversations
            .get(key)
            .map(|log| log.records.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by_key(|r| r.sort_key());
        records
    }

    /// Number of live subscribers on a conversation.
    pub fn subscriber_count(&self, key: &ConversationKey) -> usize {
        self.conversations
            .get(key)
            .map(|log| log.subscribers.len())
            .unwrap_or(0)
    }

    /// Number of `append` calls made so far, including rejected ones.
    pub fn append_calls(&self) -> u64 {
        self.append_calls.load(Ordering::Relaxed)
    }

    /// Drop all conversations, records and subscribers.
    ///
    /// Open feeds end as if unsubscribed.
    pub fn clear(&self) {
        self.conversations.clear();
    }

    /// Cause the next `append` to fail with the given reason.
    pub fn fail_next_append(&self, reason: &str) {
        let mut faults = self.faults.lock().unwrap();
        faults.next_append = Some(reason.to_string());
    }

    /// Cause the next `count` calls to `subscribe` to fail with the
    /// given reason.
    pub fn fail_next_subscribes(&self, count: u32, reason: &str) {
        let mut faults = self.faults.lock().unwrap();
        for _ in 0..count {
            faults.next_subscribes.push_back(reason.to_string());
        }
    }

    /// Break every live feed on a conversation.
    ///
    /// Each subscriber receives a terminal [`FeedEvent::Failed`] and is
    /// dropped from the store; records are untouched.
    pub fn break_feed(&self, key: &ConversationKey, reason: &str) {
        if let Some(mut log) = self.conversations.get_mut(key) {
            for sub in log.subscribers.drain(..) {
                let _ = sub.sender.send(FeedEvent::Failed {
                    reason: reason.to_string(),
                });
            }
            tracing::warn!("broke feeds on {}: {}", conversation_path(key), reason);
        }
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(
        &self,
        key: &ConversationKey,
        record: MessageRecord,
    ) -> StoreResult<MessageId> {
        self.append_calls.fetch_add(1, Ordering::Relaxed);

        // Check for forced failure
        if let Some(reason) = self.faults.lock().unwrap().next_append.take() {
            return Err(StoreError::WriteFailed { reason });
        }

        let mut log = self.conversations.entry(key.clone()).or_default();
        if log.records.contains_key(&record.message_id) {
            return Err(StoreError::DuplicateMessageId {
                id: record.message_id,
            });
        }

        let id = record.message_id;
        log.records.insert(id, record.clone());
        tracing::debug!("appended {}", message_path(key, &id));
        log.broadcast(ChangeEvent::added(record));
        Ok(id)
    }

    async fn subscribe(&self, key: &ConversationKey) -> StoreResult<Subscription> {
        // Check for forced failure
        if let Some(reason) = self.faults.lock().unwrap().next_subscribes.pop_front() {
            return Err(StoreError::SubscribeFailed { reason });
        }

        let (sender, events) = mpsc::unbounded_channel();
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);

        let mut log = self.conversations.entry(key.clone()).or_default();

        // Replay the existing log as Added events, in display order,
        // before any live change can be delivered.
        let mut backlog: Vec<MessageRecord> = log.records.values().cloned().collect();
        backlog.sort_by_key(|r| r.sort_key());
        for record in backlog {
            let _ = sender.send(FeedEvent::Change(ChangeEvent::added(record)));
        }

        log.subscribers.push(Subscriber {
            id: subscriber_id,
            sender,
        });
        tracing::debug!(
            "subscriber {} attached to {}",
            subscriber_id,
            conversation_path(key)
        );

        Ok(Subscription {
            handle: SubscriptionHandle::new(key.clone(), subscriber_id),
            events,
        })
    }

    async fn unsubscribe(&self, handle: &SubscriptionHandle) {
        if let Some(mut log) = self.conversations.get_mut(handle.key()) {
            let before = log.subscribers.len();
            log.subscribers
                .retain(|sub| sub.id != handle.subscriber_id());
            if log.subscribers.len() < before {
                tracing::debug!(
                    "subscriber {} detached from {}",
                    handle.subscriber_id(),
                    conversation_path(handle.key())
                );
            }
        }
    }
}

//! ConversationSynchronizer - the live view maintainer.
//!
//! This module provides [`ConversationSynchronizer`], which owns one
//! subscription on a [`MessageStore`] and folds its feed into the ordered,
//! duplicate-free [`Timeline`] from `chat-core`. Every applied change is
//! forwarded as a [`SyncUpdate`] so a view layer can patch itself
//! incrementally instead of re-rendering.
//!
//! # Architecture
//!
//! ```text
//! MessageStore feed → consumer task → Timeline (pure merge)
//!                          ↓
//!                   SyncUpdate receiver (view layer)
//! ```
//!
//! A single consumer task serializes all timeline mutations. One merge
//! runs without await points, so cancelling the task can only land
//! between events, never inside one. A broken feed surfaces as
//! [`SyncUpdate::StreamError`] and stops the consumer; nothing restarts
//! automatically (see [`crate::recovery`] for the explicit path).

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use chat_core::{Timeline, TimelineDelta};
use chat_store::{FeedEvent, MessageStore, StoreError, SubscriptionHandle};
use chat_types::{ConversationKey, MessageRecord};

/// Synchronizer lifecycle errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Opening the store feed failed.
    #[error("subscribe failed: {0}")]
    Subscribe(#[from] StoreError),

    /// The synchronizer already ran; instances are not reused.
    #[error("synchronizer already started")]
    AlreadyStarted,
}

/// A notification to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpdate {
    /// The timeline changed; patch the view at the delta's index.
    Delta(TimelineDelta),
    /// The timeline transitioned between empty and non-empty.
    Occupancy {
        /// True when the timeline now holds at least one record.
        non_empty: bool,
    },
    /// The store feed broke. The timeline keeps its last known-good
    /// state and no automatic resubscribe happens.
    StreamError {
        /// Backend-supplied description of the failure.
        reason: String,
    },
}

/// Maintains a live, ordered view of one conversation.
///
/// Create it with the store and conversation key, then [`start`] it to
/// receive [`SyncUpdate`]s. The synchronizer holds the only mutable
/// reference path to its timeline; accessors take snapshots.
///
/// [`start`]: ConversationSynchronizer::start
pub struct ConversationSynchronizer<S: MessageStore> {
    store: Arc<S>,
    key: ConversationKey,
    timeline: Arc<Mutex<Timeline>>,
    subscription: Option<SubscriptionHandle>,
    consumer: Option<JoinHandle<()>>,
    started: bool,
}

impl<S: MessageStore> ConversationSynchronizer<S> {
    /// Create a synchronizer for the conversation identified by `key`.
    pub fn new(store: Arc<S>, key: ConversationKey) -> Self {
        Self {
            store,
            key,
            timeline: Arc::new(Mutex::new(Timeline::new())),
            subscription: None,
            consumer: None,
            started: false,
        }
    }

    /// Subscribe to the store and start folding the feed.
    ///
    /// Returns the update channel for the view layer. The existing log
    /// arrives first (replayed by the store as `Added` events), then
    /// every later change. Fails with [`SyncError::AlreadyStarted`] when
    /// called a second time, including after [`stop`]; a failed subscribe
    /// leaves the instance unstarted so the caller may try again.
    ///
    /// [`stop`]: ConversationSynchronizer::stop
    pub async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<SyncUpdate>, SyncError> {
        if self.started {
            return Err(SyncError::AlreadyStarted);
        }

        let subscription = self.store.subscribe(&self.key).await?;
        self.started = true;
        self.subscription = Some(subscription.handle.clone());
        tracing::info!("synchronizer started on {}", self.key);

        let (updates, receiver) = mpsc::unbounded_channel();
        let timeline = Arc::clone(&self.timeline);
        let key = self.key.clone();
        let mut events = subscription.events;

        self.consumer = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    FeedEvent::Change(change) => {
                        let mut guard = timeline.lock().await;
                        let was_empty = guard.is_empty();
                        let Some(delta) = guard.apply(change) else {
                            // Duplicate or unknown id: nothing changed.
                            continue;
                        };
                        let empty = guard.is_empty();
                        drop(guard);

                        if updates.send(SyncUpdate::Delta(delta)).is_err() {
                            break; // view is gone
                        }
                        if was_empty != empty {
                            let occupancy = SyncUpdate::Occupancy { non_empty: !empty };
                            if updates.send(occupancy).is_err() {
                                break;
                            }
                        }
                    }
                    FeedEvent::Failed { reason } => {
                        tracing::warn!("feed on {} failed: {}", key, reason);
                        let _ = updates.send(SyncUpdate::StreamError { reason });
                        break;
                    }
                }
            }
        }));

        Ok(receiver)
    }

    /// Stop consuming and release the subscription.
    ///
    /// Safe to call at any moment and idempotent. Events still queued are
    /// dropped whole; a change already being applied completes first. The
    /// materialized timeline is kept, so [`messages`] still answers after
    /// stopping.
    ///
    /// [`messages`]: ConversationSynchronizer::messages
    pub async fn stop(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
        }
        if let Some(handle) = self.subscription.take() {
            self.store.unsubscribe(&handle).await;
            tracing::info!("synchronizer stopped on {}", self.key);
        }
    }

    /// Snapshot of the ordered records.
    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.timeline.lock().await.records().to_vec()
    }

    /// Number of records currently materialized.
    pub async fn len(&self) -> usize {
        self.timeline.lock().await.len()
    }

    /// Check if no records are materialized.
    pub async fn is_empty(&self) -> bool {
        self.timeline.lock().await.is_empty()
    }

    /// The conversation this synchronizer watches.
    pub fn key(&self) -> &ConversationKey {
        &self.key
    }
}

impl<S: MessageStore> Drop for ConversationSynchronizer<S> {
    fn drop(&mut self) {
        // The store-side registration is pruned on its next delivery.
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
        }
    }
}

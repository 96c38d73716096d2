//! # chat-client
//!
//! Client library for pairchat conversations.
//!
//! This is the crate applications embed to run a live two-party
//! conversation: it drives a `chat-store` backend with the pure merge
//! logic from `chat-core`.
//!
//! ## Components
//!
//! - [`ConversationSynchronizer`] - folds a store feed into an ordered,
//!   duplicate-free view and notifies a consumer incrementally
//! - [`SendPipeline`] - validates and appends outgoing messages
//! - [`resubscribe_with_backoff`] - explicit, bounded feed recovery
//!
//! ## Example
//!
//! ```ignore
//! use chat_client::{ConversationSynchronizer, SendPipeline};
//! use chat_store::MemoryStore;
//! use chat_types::{ConversationKey, ParticipantId};
//!
//! let store = Arc::new(MemoryStore::new());
//! let me = ParticipantId::new("u1")?;
//! let peer = ParticipantId::new("u2")?;
//! let key = ConversationKey::between(&me, &peer)?;
//!
//! let mut sync = ConversationSynchronizer::new(store.clone(), key.clone());
//! let mut updates = sync.start().await?;
//!
//! let pipeline = SendPipeline::new(store);
//! pipeline.send(&key, &me, &peer, "hello").await?;
//!
//! // The sent message arrives through the live feed.
//! let update = updates.recv().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod recovery;
pub mod send;
pub mod synchronizer;

pub use recovery::resubscribe_with_backoff;
pub use send::{now_millis, SendError, SendPipeline};
pub use synchronizer::{ConversationSynchronizer, SyncError, SyncUpdate};

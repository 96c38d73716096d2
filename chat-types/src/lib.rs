//! # chat-types
//!
//! Data model types for the pairchat conversation engine.
//!
//! This crate provides the foundational types used across all pairchat crates:
//! - [`ParticipantId`], [`ConversationKey`], [`MessageId`] - Identity types
//! - [`MessageRecord`] - The persisted message document
//! - [`ChangeEvent`] - Incremental log changes delivered over a feed
//! - [`InvalidParticipants`] - Pair validation errors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod ids;
mod record;

pub use error::InvalidParticipants;
pub use events::{ChangeEvent, ChangeKind};
pub use ids::{ConversationKey, MessageId, ParticipantId};
pub use record::{Direction, MessageRecord};

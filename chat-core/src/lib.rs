//! # chat-core
//!
//! Pure merge logic for pairchat (no I/O, instant tests).
//!
//! This crate implements the ordering and pacing algorithms for
//! conversation sync without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! Everything in this crate is **pure** - change events go in, deltas and
//! durations come out, nothing else happens. This enables:
//! - Unit tests that finish instantly (no mocks, no async)
//! - The same result on every replica for the same event sequence
//! - Merge behavior that can be read top to bottom
//!
//! The actual I/O (store writes, live feeds) lives in `chat-store` and
//! `chat-client`, which drive these types with the events they receive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod retry;
pub mod timeline;

pub use retry::RetryPolicy;
pub use timeline::{Timeline, TimelineDelta};

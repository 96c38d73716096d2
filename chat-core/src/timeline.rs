//! Materialized conversation timeline.
//!
//! This module maintains the ordered, duplicate-free sequence of message
//! records a view renders. Change events from a store feed are merged one
//! at a time, and each applied event yields a [`TimelineDelta`] naming the
//! exact index that changed, so a list view can patch itself instead of
//! re-sorting.
//!
//! The merge never assumes delivery order: an `Added` record is inserted
//! at its sorted position (ascending `created_at`, ties broken by message
//! id), and a redelivered record changes nothing.

use std::collections::HashSet;

use chat_types::{ChangeEvent, ChangeKind, MessageId, MessageRecord};

/// The structured outcome of applying one change event.
///
/// Indexes refer to the sequence just after an insert or update and just
/// before a removal, matching what a list view needs to patch itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineDelta {
    /// A record entered the sequence.
    Inserted {
        /// Position the record now occupies.
        index: usize,
        /// The inserted record.
        record: MessageRecord,
    },
    /// A record was replaced in place.
    Updated {
        /// Position of the replaced record.
        index: usize,
        /// The record's new state.
        record: MessageRecord,
    },
    /// A record left the sequence.
    Removed {
        /// Position the record held before removal.
        index: usize,
        /// The record as the sequence last held it.
        record: MessageRecord,
    },
}

/// Ordered, duplicate-free message sequence.
///
/// Records are kept in ascending `(created_at, message_id)` order. A
/// membership set backs the duplicate check, so a redelivered `Added`
/// is a no-op rather than a second row.
#[derive(Debug, Default)]
pub struct Timeline {
    records: Vec<MessageRecord>,
    ids: HashSet<MessageId>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one change event into the sequence.
    ///
    /// Returns `None` when the event changes nothing: a redelivered
    /// `Added` for an id already present, or a `Modified`/`Removed` for
    /// an id the sequence does not hold.
    pub fn apply(&mut self, event: ChangeEvent) -> Option<TimelineDelta> {
        match event.kind {
            ChangeKind::Added => self.insert(event.record),
            ChangeKind::Modified => self.update(event.record),
            ChangeKind::Removed => self.remove(&event.record.message_id),
        }
    }

    fn insert(&mut self, record: MessageRecord) -> Option<TimelineDelta> {
        if self.ids.contains(&record.message_id) {
            return None;
        }
        let index = self
            .records
            .partition_point(|existing| existing.sort_key() < record.sort_key());
        self.ids.insert(record.message_id);
        self.records.insert(index, record.clone());
        Some(TimelineDelta::Inserted { index, record })
    }

    fn update(&mut self, record: MessageRecord) -> Option<TimelineDelta> {
        let index = self.position(&record.message_id)?;
        // created_at is immutable by contract, so the sort position holds.
        self.records[index] = record.clone();
        Some(TimelineDelta::Updated { index, record })
    }

    fn remove(&mut self, id: &MessageId) -> Option<TimelineDelta> {
        let index = self.position(id)?;
        let record = self.records.remove(index);
        self.ids.remove(id);
        Some(TimelineDelta::Removed { index, record })
    }

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.records.iter().position(|r| &r.message_id == id)
    }

    /// The records in display order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Number of records in the sequence.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether a record with `id` is currently present.
    pub fn contains(&self, id: &MessageId) -> bool {
        self.ids.contains(id)
    }
}

//! Change events delivered over a conversation feed.

use serde::{Deserialize, Serialize};

use crate::MessageRecord;

/// The kind of change a feed delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A record entered the log (including backlog replay on subscribe)
    Added,
    /// An existing record changed in place (only the `read` flag mutates)
    Modified,
    /// A record left the log
    Removed,
}

/// One incremental change to a conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened
    pub kind: ChangeKind,
    /// The record after the change; for [`ChangeKind::Removed`], its last state
    pub record: MessageRecord,
}

impl ChangeEvent {
    /// An `Added` event carrying `record`.
    pub fn added(record: MessageRecord) -> Self {
        Self {
            kind: ChangeKind::Added,
            record,
        }
    }

    /// A `Modified` event carrying the updated `record`.
    pub fn modified(record: MessageRecord) -> Self {
        Self {
            kind: ChangeKind::Modified,
            record,
        }
    }

    /// A `Removed` event carrying the record's last state.
    pub fn removed(record: MessageRecord) -> Self {
        Self {
            kind: ChangeKind::Removed,
            record,
        }
    }
}

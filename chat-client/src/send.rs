//! SendPipeline - validate, stamp, and persist outgoing messages.
//!
//! The pipeline is deliberately thin: it trims and rejects blank input,
//! stamps a fresh id and the current wall-clock time, and hands the
//! record to the store. There is no optimistic local echo; the sender's
//! view picks the message up from the store feed like any other change,
//! so a message shown on screen is always a message that was accepted.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use chat_store::{MessageStore, StoreError};
use chat_types::{ConversationKey, MessageId, MessageRecord, ParticipantId};

/// Errors from [`SendPipeline::send`].
#[derive(Debug, Error)]
pub enum SendError {
    /// The text was empty after trimming; the store was never called.
    #[error("message is empty")]
    EmptyMessage,

    /// The store rejected the append. The message is not persisted and
    /// is not retried.
    #[error("send failed: {0}")]
    SendFailed(#[from] StoreError),
}

/// Sends messages into a conversation through a [`MessageStore`].
pub struct SendPipeline<S: MessageStore> {
    store: Arc<S>,
}

impl<S: MessageStore> SendPipeline<S> {
    /// Create a pipeline backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Send `raw_text` from `sender` to `receiver`.
    ///
    /// Leading and trailing whitespace is stripped. Blank input fails
    /// with [`SendError::EmptyMessage`] before any store call. On
    /// success the freshly assigned id is returned; on store failure the
    /// error carries the store's reason and no retry happens.
    pub async fn send(
        &self,
        key: &ConversationKey,
        sender: &ParticipantId,
        receiver: &ParticipantId,
        raw_text: &str,
    ) -> Result<MessageId, SendError> {
        let body = raw_text.trim();
        if body.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        let record = MessageRecord::new(
            MessageId::new(),
            sender.clone(),
            receiver.clone(),
            body,
            now_millis(),
        );
        tracing::debug!("sending {} on {}", record.message_id, key);

        let id = self.store.append(key, record).await?;
        Ok(id)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_store::MemoryStore;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s).unwrap()
    }

    fn key() -> ConversationKey {
        ConversationKey::between(&pid("u1"), &pid("u2")).unwrap()
    }

    #[tokio::test]
    async fn send_persists_a_stamped_record() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = SendPipeline::new(store.clone());

        let id = pipeline.send(&key(), &pid("u1"), &pid("u2"), "hello").await.unwrap();

        let records = store.records(&key());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message_id, id);
        assert_eq!(records[0].body, "hello");
        assert_eq!(records[0].sender_id, pid("u1"));
        assert_eq!(records[0].receiver_id, pid("u2"));
        assert!(!records[0].read);
        assert!(records[0].created_at > 0);
    }

    #[tokio::test]
    async fn send_trims_body() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = SendPipeline::new(store.clone());

        pipeline.send(&key(), &pid("u1"), &pid("u2"), "  hi there \n").await.unwrap();

        assert_eq!(store.records(&key())[0].body, "hi there");
    }

    #[tokio::test]
    async fn blank_send_never_touches_store() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = SendPipeline::new(store.clone());

        let empty = pipeline.send(&key(), &pid("u1"), &pid("u2"), "").await;
        let blank = pipeline.send(&key(), &pid("u1"), &pid("u2"), "   \t\n").await;

        assert!(matches!(empty, Err(SendError::EmptyMessage)));
        assert!(matches!(blank, Err(SendError::EmptyMessage)));
        assert_eq!(store.append_calls(), 0);
    }

    #[tokio::test]
    async fn each_send_gets_a_fresh_id() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = SendPipeline::new(store.clone());

        let first = pipeline.send(&key(), &pid("u1"), &pid("u2"), "one").await.unwrap();
        let second = pipeline.send(&key(), &pid("u1"), &pid("u2"), "two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.records(&key()).len(), 2);
    }

    #[tokio::test]
    async fn store_failure_maps_to_send_failed() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next_append("disk full");
        let pipeline = SendPipeline::new(store.clone());

        let result = pipeline.send(&key(), &pid("u1"), &pid("u2"), "hello").await;

        match result {
            Err(SendError::SendFailed(StoreError::WriteFailed { reason })) => {
                assert_eq!(reason, "disk full");
            }
            other => panic!("expected write failure, got {:?}", other),
        }
        assert!(store.records(&key()).is_empty());
    }

    #[test]
    fn now_millis_is_past_2024() {
        // 2024-01-01T00:00:00Z
        assert!(now_millis() > 1_704_067_200_000);
    }
}

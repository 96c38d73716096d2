//! Explicit feed recovery with bounded backoff.
//!
//! A [`ConversationSynchronizer`] never resubscribes on its own; after a
//! [`SyncUpdate::StreamError`] the caller decides whether reconnecting is
//! worth it. When it is, [`resubscribe_with_backoff`] builds a fresh
//! synchronizer and retries the subscribe under a [`RetryPolicy`],
//! sleeping between attempts and giving up once the budget is spent.

use std::sync::Arc;

use tokio::sync::mpsc;

use chat_core::RetryPolicy;
use chat_store::MessageStore;
use chat_types::ConversationKey;

use crate::synchronizer::{ConversationSynchronizer, SyncError, SyncUpdate};

/// Start a fresh synchronizer on `key`, retrying failed subscribes.
///
/// Attempts are bounded by `policy`; each failure waits the policy's
/// backoff delay before the next try. Returns the started synchronizer
/// and its update channel, or the last subscribe error once the attempt
/// budget is exhausted.
pub async fn resubscribe_with_backoff<S: MessageStore>(
    store: Arc<S>,
    key: ConversationKey,
    policy: &RetryPolicy,
) -> Result<(ConversationSynchronizer<S>, mpsc::UnboundedReceiver<SyncUpdate>), SyncError> {
    let mut attempt: u32 = 1;
    loop {
        let mut sync = ConversationSynchronizer::new(Arc::clone(&store), key.clone());
        match sync.start().await {
            Ok(updates) => {
                if attempt > 1 {
                    tracing::info!("resubscribed to {} on attempt {}", key, attempt);
                }
                return Ok((sync, updates));
            }
            Err(error) => {
                let Some(delay) = policy.delay_for(attempt) else {
                    tracing::error!(
                        "giving up on {} after {} attempts: {}",
                        key,
                        attempt,
                        error
                    );
                    return Err(error);
                };
                tracing::warn!(
                    "subscribe attempt {} on {} failed ({}), retrying in {:?}",
                    attempt,
                    key,
                    error,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

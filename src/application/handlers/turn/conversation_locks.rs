//! One turn at a time per conversation.
//!
//! The transport may deliver two activities for the same conversation
//! concurrently. Both would load the same snapshot and the later save would
//! silently drop the earlier turn, so turns for one key queue behind a
//! per-key async mutex. Different conversations never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationKey;

/// Idle entries are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<ConversationKey, Arc<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn holds `key`. The lock is released when the
    /// guard drops.
    pub async fn acquire(&self, key: &ConversationKey) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(key);
        lock.lock_owned().await
    }

    fn lock_for(&self, key: &ConversationKey) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };

        if locks.len() >= SWEEP_THRESHOLD {
            // Only the map holds an idle lock.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Number of conversations with a tracked lock.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(id: &str) -> ConversationKey {
        ConversationKey::new("test", id).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_waits_for_release() {
        let locks = Arc::new(ConversationLocks::new());
        let guard = locks.acquire(&key("a")).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&key("a")).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once the lock is released")
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = ConversationLocks::new();
        let _a = locks.acquire(&key("a")).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(&key("b"))).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_locks_are_swept() {
        let locks = ConversationLocks::new();
        for i in 0..SWEEP_THRESHOLD {
            drop(locks.acquire(&key(&i.to_string())).await);
        }
        assert_eq!(locks.len(), SWEEP_THRESHOLD);

        let _held = locks.acquire(&key("fresh")).await;
        assert_eq!(locks.len(), 1);
    }
}

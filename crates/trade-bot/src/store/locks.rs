use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// Per-conversation async locks
///
/// A turn loads state, runs one dialog step and saves; holding the
/// conversation's lock for the whole turn keeps two messages of the same
/// conversation from overwriting each other's portfolio. Different
/// conversations never wait on each other.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock of `key`
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits for
    pub fn prune(&self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_serialized() {
        let locks = Arc::new(ConversationLocks::new());
        let guard = locks.lock("alice").await;

        let other = Arc::clone(&locks);
        let waiter = tokio::spawn(async move {
            let _guard = other.lock("alice").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_independent() {
        let locks = ConversationLocks::new();
        let _alice = locks.lock("alice").await;
        let _bob = locks.lock("bob").await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_prune_released() {
        let locks = ConversationLocks::new();
        {
            let _guard = locks.lock("alice").await;
            locks.prune();
            assert_eq!(locks.len(), 1);
        }
        locks.prune();
        assert!(locks.is_empty());
    }
}

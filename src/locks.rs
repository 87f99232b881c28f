use crate::errors::ServiceError;
use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;
use uuid::Uuid;

/// Per-key async mutex registry.
///
/// Serializes use cases that mutate the same aggregate: punches by employee
/// id, ledger writes by item id, payment capture by internal location id.
/// Locks are created on first use and live for the process lifetime.
#[derive(Clone)]
pub struct KeyedLocks(Arc<DashMap<Uuid, Arc<Mutex<()>>>>);

impl Default for KeyedLocks {
    fn default() -> Self {
        Self(Arc::new(DashMap::new()))
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, registering it on first use. The returned
    /// guard must be held for the duration of the use case.
    pub async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .0
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Acquire several locks at once. Keys are sorted and deduplicated first
    /// so every caller takes them in the same global order.
    pub async fn acquire_many(&self, mut keys: Vec<Uuid>) -> Vec<OwnedMutexGuard<()>> {
        keys.sort_unstable();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }
}

/// Runs `op`, retrying it exactly once when the store reports write
/// contention. Any other failure is surfaced immediately.
pub async fn with_conflict_retry<'a, T>(
    op: impl Fn() -> BoxFuture<'a, Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match op().await {
        Err(e) if e.is_retryable() => {
            warn!("Retrying after write contention: {}", e);
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_key_serializes() {
        let locks = KeyedLocks::new();
        let key = Uuid::new_v4();

        let guard = locks.acquire(key).await;
        let locks2 = locks.clone();
        let contender = tokio::spawn(async move {
            let _g = locks2.acquire(key).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.expect("contender completes after release");
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn acquire_many_deduplicates_repeated_keys() {
        let locks = KeyedLocks::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // A repeated key must not deadlock against itself.
        let guards = locks.acquire_many(vec![a, b, a]).await;
        assert_eq!(guards.len(), 2);
    }

    #[tokio::test]
    async fn conflict_is_retried_once() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32, ServiceError> = with_conflict_retry(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if n == 0 {
                    Err(ServiceError::ConcurrencyConflict(Uuid::new_v4()))
                } else {
                    Ok(n)
                }
            })
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), ServiceError> = with_conflict_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(ServiceError::NotFound("gone".into())) })
        })
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

//! Per-key memoization of asynchronous lookups.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use super::error::ModelError;

/// Memo table mapping a key to the first successfully resolved value.
///
/// Concurrent callers for the same key share a single in-flight lookup.
/// Failed lookups leave no entry behind, so the next call retries. Entries live
/// until [`Memo::invalidate`] or [`Memo::clear`] removes them; there is no
/// size bound or automatic eviction.
#[derive(Debug)]
pub struct Memo<V> {
    cells: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V: Clone> Memo<V> {
    /// Creates an empty memo table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// success.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`; nothing is cached in that case.
    pub async fn get_or_try_init<F, Fut>(&self, key: &str, fetch: F) -> Result<V, ModelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ModelError>>,
    {
        let cell = {
            let mut cells = self.lock();
            Arc::clone(cells.entry(key.to_owned()).or_default())
        };

        if let Some(value) = cell.get() {
            tracing::trace!(key, "memo hit");
            return Ok(value.clone());
        }

        let result = cell.get_or_try_init(fetch).await.cloned();
        if result.is_err() {
            self.forget_failed(key, &cell);
        }
        result
    }

    /// Returns the cached value for `key` without fetching.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<V> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drops the entry for `key`, forcing the next lookup to fetch again.
    pub fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of keys with a resolved value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Returns true when no key has a resolved value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn forget_failed(&self, key: &str, cell: &Arc<OnceCell<V>>) {
        let mut cells = self.lock();
        let stale = cells
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            cells.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<V>>>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl<V: Clone> Memo<V> {
    fn slots(&self) -> usize {
        self.lock().len()
    }
}

impl<V: Clone> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Memo;
    use crate::github::error::ModelError;

    #[tokio::test]
    async fn resolves_each_key_once() {
        let memo = Memo::<u32>::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_try_init("octo/repo", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .expect("lookup should succeed");
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_lookup() {
        let memo = Arc::new(Memo::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let lookups = (0..4).map(|_| {
            let memo = Arc::clone(&memo);
            let calls = Arc::clone(&calls);
            async move {
                memo.get_or_try_init("octo/repo", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok(1)
                })
                .await
            }
        });
        let values = futures::future::try_join_all(lookups)
            .await
            .expect("lookups should succeed");

        assert_eq!(values, vec![1, 1, 1, 1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let memo = Memo::<u32>::new();

        let first = memo
            .get_or_try_init("octo/repo", || async {
                Err(ModelError::Network {
                    message: "timeout".to_owned(),
                })
            })
            .await;
        assert!(first.is_err());
        assert!(memo.is_empty());
        assert_eq!(memo.slots(), 0, "failed keys should not linger");

        let second = memo
            .get_or_try_init("octo/repo", || async { Ok(3) })
            .await
            .expect("retry should succeed");
        assert_eq!(second, 3);
    }

    #[tokio::test]
    async fn repeated_failures_leave_no_entries() {
        let memo = Memo::<u32>::new();

        for index in 0..10 {
            let key = format!("octo/repo-{index}");
            let outcome = memo
                .get_or_try_init(&key, || async {
                    Err(ModelError::NotFound {
                        message: "gone".to_owned(),
                    })
                })
                .await;
            assert!(outcome.is_err());
        }

        assert_eq!(memo.slots(), 0);
    }

    #[tokio::test]
    async fn invalidate_and_clear_force_refetch() {
        let memo = Memo::<u32>::new();
        for key in ["a/b", "c/d"] {
            memo.get_or_try_init(key, || async { Ok(1) })
                .await
                .expect("lookup should succeed");
        }

        memo.invalidate("a/b");
        assert_eq!(memo.peek("a/b"), None);
        assert_eq!(memo.peek("c/d"), Some(1));

        memo.clear();
        assert!(memo.is_empty());
    }
}

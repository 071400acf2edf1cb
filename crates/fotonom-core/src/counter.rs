//! Per-category sequence numbering backed by an external atomic counter.
//!
//! The store owns the numbers; this component never caches a value across
//! calls, so multiple process instances sharing one store stay collision-free
//! for the same category.

use crate::error::StoreError;
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Atomic upsert-increment store, keyed by category name.
///
/// Implementations must serialize concurrent increments of the same
/// category: an unseen category initializes to 1, otherwise the stored
/// value is incremented and the new value returned.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, category: &str) -> Result<u32, StoreError>;
}

/// In-process store for single-instance deployments and tests.
///
/// Real deployments back [`CounterStore`] with a database upsert so the
/// sequence survives restarts and is shared across instances.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, u32>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, category: &str) -> Result<u32, StoreError> {
        let mut counters = self.counters.lock().await;
        let value = counters.entry(category.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

/// Hands out strictly increasing integers per category.
pub struct SequenceCounter {
    store: Arc<dyn CounterStore>,
}

impl SequenceCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Next ordinal for `category`.
    ///
    /// If the store is unreachable, degrades to a pseudo-random number in
    /// `[1, 1000]` rather than failing the photo. The substitute can collide
    /// with a legitimately issued number for the same category; callers
    /// accept that over losing the item.
    pub async fn next(&self, category: &str) -> u32 {
        match self.store.increment(category).await {
            Ok(value) => value,
            Err(e) => {
                let substitute = rand::thread_rng().gen_range(1..=1000);
                tracing::warn!(
                    "counter store failed for category '{category}' ({e}), \
                     substituting random sequence {substitute}"
                );
                substitute
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FailingStore;

    #[async_trait]
    impl CounterStore for FailingStore {
        async fn increment(&self, _category: &str) -> Result<u32, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sequence_starts_at_one_per_category() {
        let counter = SequenceCounter::new(Arc::new(MemoryCounterStore::new()));
        assert_eq!(counter.next("Strand").await, 1);
        assert_eq!(counter.next("Strand").await, 2);
        assert_eq!(counter.next("Park").await, 1);
        assert_eq!(counter.next("Strand").await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_distinct_and_contiguous() {
        let counter = Arc::new(SequenceCounter::new(Arc::new(MemoryCounterStore::new())));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let counter = counter.clone();
            handles.push(tokio::spawn(async move { counter.next("Strand").await }));
        }

        let mut values = HashSet::new();
        for handle in handles {
            values.insert(handle.await.unwrap());
        }

        assert_eq!(values.len(), 50);
        let expected: HashSet<u32> = (1..=50).collect();
        assert_eq!(values, expected);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_random_in_range() {
        let counter = SequenceCounter::new(Arc::new(FailingStore));
        for _ in 0..20 {
            let value = counter.next("Strand").await;
            assert!((1..=1000).contains(&value), "out of range: {value}");
        }
    }
}

//! In-process bounded backend.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::cache::{BoundedStore, CacheStats};
use crate::error::Result;

// == In-Memory Bounded Backend ==
/// Thread-safe wrapper around a [`BoundedStore`].
///
/// `set`, `get` (which may reclaim an expired entry) and `clear` all take
/// the same exclusive lock, so concurrent inserts cannot break the capacity
/// or insertion-order invariants.
#[derive(Debug)]
pub struct InMemoryBoundedBackend {
    store: Mutex<BoundedStore>,
}

impl InMemoryBoundedBackend {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(BoundedStore::new(capacity)?),
        })
    }

    /// Always succeeds; a new key at capacity evicts the oldest insertion.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> bool {
        self.lock().set(key, value, ttl_seconds);
        true
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key)
    }

    pub fn clear(&self, key: &str) -> bool {
        self.lock().clear(key)
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // No store operation panics between mutations; a poisoned lock is reused.
    fn lock(&self) -> MutexGuard<'_, BoundedStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = InMemoryBoundedBackend::new(10).unwrap();

        assert!(backend.set("a", json!("1"), 5));
        assert_eq!(backend.get("a"), Some(json!("1")));
        assert!(backend.clear("a"));
        assert_eq!(backend.get("a"), None);
        assert!(!backend.clear("a"));
    }

    #[test]
    fn test_memory_backend_rejects_zero_capacity() {
        assert!(InMemoryBoundedBackend::new(0).is_err());
    }

    #[test]
    fn test_concurrent_inserts_respect_capacity() {
        let capacity = 64;
        let backend = Arc::new(InMemoryBoundedBackend::new(capacity).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let backend = Arc::clone(&backend);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("t{t}-k{i}");
                        assert!(backend.set(&key, json!(i), 60));
                        backend.get(&key);
                        if i % 7 == 0 {
                            backend.clear(&format!("t{t}-k{}", i / 2));
                        }
                        assert!(backend.len() <= capacity);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(backend.len() <= capacity);
        let stats = backend.stats();
        assert_eq!(stats.total_entries, backend.len());
    }

    #[test]
    fn test_concurrent_writers_keep_latest_inserts() {
        let capacity = 16;
        let backend = Arc::new(InMemoryBoundedBackend::new(capacity).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let backend = Arc::clone(&backend);
                thread::spawn(move || {
                    for i in 0..100 {
                        backend.set(&format!("{t}:{i}"), json!(i), 60);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let live: HashSet<String> = (0..4)
            .flat_map(|t| (0..100).map(move |i| format!("{t}:{i}")))
            .filter(|k| backend.get(k).is_some())
            .collect();
        assert_eq!(live.len(), capacity);
        assert_eq!(backend.stats().evictions, 400 - capacity as u64);
    }
}

//! Bounded Store Module
//!
//! Capacity-bounded key/value storage with FIFO eviction and lazy TTL
//! expiration. Not synchronized; the memory backend wraps it in a mutex.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, FifoTracker};
use crate::error::{CacheError, Result};

/// A stored entry tagged with the sequence number of its insertion slot.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    seq: u64,
}

// == Bounded Store ==
/// Insertion-ordered storage holding at most `capacity` entries.
///
/// Invariants after every operation:
/// - `len() <= capacity()`
/// - eviction order is first-insertion order; reads and overwrites never
///   reorder a key
#[derive(Debug)]
pub struct BoundedStore {
    /// Key-value storage
    entries: HashMap<String, Slot>,
    /// First-insertion order
    order: FifoTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, fixed at construction
    capacity: usize,
}

impl BoundedStore {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// A zero capacity could never satisfy a `set`, so it is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::Configuration(
                "memory cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            order: FifoTracker::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    pub fn set(&mut self, key: &str, value: Value, ttl_seconds: u64) {
        self.set_at(key, value, ttl_seconds, current_timestamp_ms());
    }

    /// Stores `value` under `key` using `now_ms` as the current time.
    ///
    /// An existing key is replaced wholesale but keeps its insertion slot.
    /// A new key arriving at capacity first evicts the oldest insertion,
    /// whether or not that entry has already expired.
    pub fn set_at(&mut self, key: &str, value: Value, ttl_seconds: u64, now_ms: u64) {
        let entry = CacheEntry::new_at(value, ttl_seconds, now_ms);

        if let Some(slot) = self.entries.get_mut(key) {
            slot.entry = entry;
            return;
        }

        if self.entries.len() >= self.capacity {
            let entries = &self.entries;
            let evicted = self.order.evict_oldest(|k, seq| is_live(entries, k, seq));
            if let Some(evicted) = evicted {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted oldest entry at capacity");
            }
        }

        let seq = self.order.insert_new(key);
        self.entries.insert(key.to_string(), Slot { entry, seq });
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a live value by key.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Retrieves a live value by key using `now_ms` as the current time.
    ///
    /// An expired entry is removed on discovery and reported as a miss.
    pub fn get_at(&mut self, key: &str, now_ms: u64) -> Option<Value> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(slot) => slot.entry.is_expired_at(now_ms),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "reclaimed expired entry on read");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|slot| slot.entry.value.clone())
    }

    // == Clear ==
    /// Removes an entry regardless of its expiration state.
    ///
    /// Returns whether an entry was present.
    pub fn clear(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Purge Expired ==
    /// Removes every expired-but-present entry.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(current_timestamp_ms())
    }

    pub fn purge_expired_at(&mut self, now_ms: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the key that the next over-capacity insertion would evict.
    pub fn oldest_key(&self) -> Option<&str> {
        let entries = &self.entries;
        self.order.peek_oldest(|k, seq| is_live(entries, k, seq))
    }

    /// Drops the entry; its queue slot goes stale. Stale slots are compacted
    /// away once they outnumber the capacity.
    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }

        if self.order.len() > self.capacity.saturating_mul(2) {
            let entries = &self.entries;
            self.order.compact(|k, seq| is_live(entries, k, seq));
        }
        self.stats.set_total_entries(self.entries.len());
        true
    }

    #[cfg(test)]
    fn queued_slots(&self) -> usize {
        self.order.len()
    }
}

fn is_live(entries: &HashMap<String, Slot>, key: &str, seq: u64) -> bool {
    entries.get(key).is_some_and(|slot| slot.seq == seq)
}

//! FIFO Tracker Module
//!
//! Tracks first-insertion order for capacity eviction.

use std::collections::VecDeque;

// == FIFO Tracker ==
/// Tracks the order in which keys were first inserted.
///
/// Every insertion is tagged with a sequence number that the store keeps next
/// to the entry. Removing a key only drops it from the store; its queue slot
/// goes stale and is skipped when it reaches the front. Removal is O(1) and
/// eviction amortized O(1).
///
/// - Front = Oldest insertion (next to evict)
/// - Back = Newest insertion
///
/// Reads and overwrites never reorder keys.
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Keys with the sequence number they were inserted under
    order: VecDeque<(String, u64)>,
    /// Sequence number handed to the next insertion
    next_seq: u64,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            next_seq: 0,
        }
    }

    // == Insert New ==
    /// Appends a key that is not live in the store and returns its sequence
    /// number.
    pub fn insert_new(&mut self, key: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.push_back((key.to_string(), seq));
        seq
    }

    // == Evict Oldest ==
    /// Removes and returns the oldest key for which `is_live` holds,
    /// discarding stale slots on the way.
    pub fn evict_oldest(&mut self, mut is_live: impl FnMut(&str, u64) -> bool) -> Option<String> {
        while let Some((key, seq)) = self.order.pop_front() {
            if is_live(&key, seq) {
                return Some(key);
            }
        }
        None
    }

    // == Peek Oldest ==
    /// Returns the oldest live key without removing it.
    pub fn peek_oldest(&self, mut is_live: impl FnMut(&str, u64) -> bool) -> Option<&str> {
        self.order
            .iter()
            .find(|(key, seq)| is_live(key, *seq))
            .map(|(key, _)| key.as_str())
    }

    // == Compact ==
    /// Drops every stale slot.
    pub fn compact(&mut self, mut is_live: impl FnMut(&str, u64) -> bool) {
        self.order.retain(|(key, seq)| is_live(key, *seq));
    }

    /// Returns the number of queue slots, stale ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }
}

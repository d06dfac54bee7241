//! Cache Entry Module
//!
//! Defines the record held for every key in the bounded store.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A stored value together with its absolute expiration time.
///
/// Entries are never mutated in place; a second `set` for the same key
/// replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, returned exactly as given
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` after `now_ms`.
    pub fn new_at(value: Value, ttl_seconds: u64, now_ms: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is logically absent at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once `now_ms >= expires_at`,
    /// so a TTL of zero yields an entry that is never observable.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero rather than panicking.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new_at(json!("test_value"), 60, current_timestamp_ms());

        assert_eq!(entry.value, json!("test_value"));
        assert_eq!(entry.expires_at, entry.created_at + 60_000);
        assert!(!entry.is_expired_at(current_timestamp_ms()));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new_at(json!("test_value"), 1, current_timestamp_ms());

        assert!(!entry.is_expired_at(current_timestamp_ms()));

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired_at(current_timestamp_ms()));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new_at(json!("test"), 5, 1_000);

        assert!(!entry.is_expired_at(5_999));
        assert!(entry.is_expired_at(6_000), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(6_001));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new_at(json!(1), 0, 42);
        assert!(entry.is_expired_at(42));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new_at(json!(1), u64::MAX, 1_000);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired_at(current_timestamp_ms()));
    }
}

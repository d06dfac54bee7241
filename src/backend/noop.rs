//! Disabled-cache backend.

use serde_json::Value;

/// Rejects every write and never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBackend;

impl NoOpBackend {
    pub fn set(&self, _key: &str, _value: Value, _ttl_seconds: u64) -> bool {
        false
    }

    pub fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    pub fn clear(&self, _key: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_never_stores() {
        let backend = NoOpBackend;

        for _ in 0..3 {
            assert!(!backend.set("a", json!("1"), 5));
            assert_eq!(backend.get("a"), None);
            assert!(!backend.clear("a"));
        }
    }
}

//! Shared-memory extension adapter.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::Result;

// == Shared Memory ==
/// Handle to a shared-memory cache provided by the host runtime and shared
/// by every worker in the process group.
pub trait SharedMemory: Send + Sync + fmt::Debug {
    /// Stores `value` under `key` for `ttl_seconds`; `Ok(false)` means the
    /// extension declined the write (for example, segment full).
    fn store(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<bool>;

    fn fetch(&self, key: &str) -> Result<Option<Value>>;

    fn delete(&self, key: &str) -> Result<bool>;
}

// == Shared Extension Backend ==
/// Maps the uniform cache contract onto a [`SharedMemory`] handle.
#[derive(Debug, Clone)]
pub struct SharedExtensionBackend {
    segment: Arc<dyn SharedMemory>,
}

impl SharedExtensionBackend {
    pub fn new(segment: Arc<dyn SharedMemory>) -> Self {
        Self { segment }
    }

    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> bool {
        self.segment
            .store(key, &value, ttl_seconds)
            .unwrap_or_else(|err| {
                warn!(key, error = %err, "shared memory store failed");
                false
            })
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.segment.fetch(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "shared memory fetch failed");
            None
        })
    }

    pub fn clear(&self, key: &str) -> bool {
        self.segment.delete(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "shared memory delete failed");
            false
        })
    }
}

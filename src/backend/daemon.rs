//! External caching daemon adapter.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::Result;

// == Daemon Family ==
/// Wire protocol family of an external daemon client.
///
/// Both families speak to a memcache-like daemon; the family only decides
/// the label reported through [`crate::Cache::cache_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaemonFamily {
    /// Classic ASCII-protocol client
    Memcache,
    /// Newer client library with its own protocol handling
    Memcached,
}

impl DaemonFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            DaemonFamily::Memcache => "memcache",
            DaemonFamily::Memcached => "memcached",
        }
    }
}

// == Daemon Client ==
/// Handle to an external caching daemon.
///
/// Implementations own their connection state and concurrency control;
/// they report transport failures as errors and let the adapter decide
/// how to degrade.
pub trait DaemonClient: Send + Sync + fmt::Debug {
    /// Protocol family of this handle.
    fn family(&self) -> DaemonFamily;

    /// Stores `value` under `key` for `ttl_seconds`.
    fn store(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<()>;

    /// Fetches a value; `Ok(None)` means the daemon does not hold the key.
    fn fetch(&self, key: &str) -> Result<Option<Value>>;

    /// Deletes a key; `Ok(false)` means the daemon did not hold it.
    fn delete(&self, key: &str) -> Result<bool>;
}

// == External Daemon Backend ==
/// Maps the uniform cache contract onto a [`DaemonClient`].
///
/// Any client error degrades to `false` or a miss.
#[derive(Debug, Clone)]
pub struct ExternalDaemonBackend {
    client: Arc<dyn DaemonClient>,
}

impl ExternalDaemonBackend {
    pub fn new(client: Arc<dyn DaemonClient>) -> Self {
        Self { client }
    }

    pub fn family(&self) -> DaemonFamily {
        self.client.family()
    }

    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> bool {
        match self.client.store(key, &value, ttl_seconds) {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "cache daemon store failed");
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.client.fetch(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "cache daemon fetch failed");
            None
        })
    }

    pub fn clear(&self, key: &str) -> bool {
        self.client.delete(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "cache daemon delete failed");
            false
        })
    }
}

//! Cache Facade
//!
//! The single type callers hold. It owns one backend for its whole lifetime
//! and forwards every call to it.

use serde_json::Value;
use tracing::debug;

use crate::backend::{Backend, CacheType};
use crate::cache::{CacheStats, DEFAULT_MEMORY_CACHE_SIZE};
use crate::config::Config;
use crate::error::Result;
use crate::selector::{select, BackendInput, EnvironmentCapabilities};

// == Cache ==
/// Uniform store/fetch/invalidate contract over one storage strategy.
///
/// Only construction can fail. Every runtime call is total: a rejected or
/// degraded write is `false`, and an absent, expired or unreachable entry is
/// `None`. A cached `false` or `null` comes back as `Some(..)`.
///
/// ```
/// use memo_cache::{Cache, EnvironmentCapabilities};
/// use serde_json::json;
///
/// let cache = Cache::new("memory".into(), &EnvironmentCapabilities::none()).unwrap();
/// assert!(cache.set("a", json!("1"), 5));
/// assert_eq!(cache.get("a"), Some(json!("1")));
/// assert!(cache.clear("a"));
/// assert_eq!(cache.get("a"), None);
/// ```
#[derive(Debug)]
pub struct Cache {
    backend: Backend,
    cache_type: CacheType,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache, sizing any bounded memory store at the default capacity.
    pub fn new(input: BackendInput, env: &EnvironmentCapabilities) -> Result<Self> {
        Self::with_memory_capacity(input, env, DEFAULT_MEMORY_CACHE_SIZE)
    }

    /// Creates a cache whose bounded memory store, if chosen, holds at most
    /// `capacity` entries.
    pub fn with_memory_capacity(
        input: BackendInput,
        env: &EnvironmentCapabilities,
        capacity: usize,
    ) -> Result<Self> {
        let backend = select(input, env, capacity)?;
        Ok(Self::from_backend(backend))
    }

    /// Creates a cache from service configuration.
    pub fn from_config(config: &Config, env: &EnvironmentCapabilities) -> Result<Self> {
        Self::with_memory_capacity(config.backend_input(), env, config.memory_cache_size)
    }

    /// Wraps an already constructed backend.
    pub fn from_backend(backend: Backend) -> Self {
        let cache_type = backend.cache_type();
        Self {
            backend,
            cache_type,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    ///
    /// Returns `false` when the backend rejects or fails the write. The
    /// bounded memory backend may evict its oldest insertion to make room.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> bool {
        if key.is_empty() {
            debug!("rejected write with empty key");
            return false;
        }
        self.backend.set(key, value, ttl_seconds)
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` on a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key.is_empty() {
            return None;
        }
        self.backend.get(key)
    }

    // == Clear ==
    /// Removes `key`; returns whether an entry existed and was removed.
    pub fn clear(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.backend.clear(key)
    }

    // == Introspection ==
    /// The strategy chosen at construction; never changes.
    pub fn cache_type(&self) -> CacheType {
        self.cache_type
    }

    /// Capacity of the bounded memory store, or `None` for other strategies.
    pub fn memory_cache_size(&self) -> Option<usize> {
        self.backend.memory_cache_size()
    }

    /// Hit/miss/eviction counters, kept by the bounded memory store only.
    pub fn stats(&self) -> Option<CacheStats> {
        self.backend.stats()
    }

    /// Reclaims expired-but-present entries from the bounded memory store.
    ///
    /// Expiry is otherwise lazy; this is never scheduled automatically.
    pub fn purge_expired(&self) -> usize {
        let removed = self.backend.purge_expired();
        if removed > 0 {
            debug!(removed, "purged expired entries");
        }
        removed
    }
}

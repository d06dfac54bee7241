//! Backend Module
//!
//! The closed set of storage strategies behind [`crate::Cache`].
//!
//! ```text
//! Backend (enum)
//!   ├── ExternalDaemon(ExternalDaemonBackend)    <- memcache-like daemon handle
//!   ├── SharedExtension(SharedExtensionBackend)  <- host shared-memory segment
//!   ├── InMemoryBounded(InMemoryBoundedBackend)  <- FIFO-bounded local store
//!   └── NoOp(NoOpBackend)                        <- caching disabled
//! ```
//!
//! Every runtime operation is total: failures surface as `false` or a miss.

mod daemon;
mod memory;
mod noop;
mod shared;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

pub use daemon::{DaemonClient, DaemonFamily, ExternalDaemonBackend};
pub use memory::InMemoryBoundedBackend;
pub use noop::NoOpBackend;
pub use shared::{SharedExtensionBackend, SharedMemory};

// == Cache Type ==
/// Label identifying the active strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheType {
    Daemon(DaemonFamily),
    SharedExtension,
    Memory,
    NoCache,
}

impl CacheType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Daemon(family) => family.as_str(),
            CacheType::SharedExtension => "shared-extension",
            CacheType::Memory => "memory",
            CacheType::NoCache => "nocache",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CacheType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// == Backend ==
/// One concrete strategy, chosen once by the selector.
#[derive(Debug)]
pub enum Backend {
    ExternalDaemon(ExternalDaemonBackend),
    SharedExtension(SharedExtensionBackend),
    InMemoryBounded(InMemoryBoundedBackend),
    NoOp(NoOpBackend),
}

impl Backend {
    pub fn cache_type(&self) -> CacheType {
        match self {
            Backend::ExternalDaemon(b) => CacheType::Daemon(b.family()),
            Backend::SharedExtension(_) => CacheType::SharedExtension,
            Backend::InMemoryBounded(_) => CacheType::Memory,
            Backend::NoOp(_) => CacheType::NoCache,
        }
    }

    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> bool {
        match self {
            Backend::ExternalDaemon(b) => b.set(key, value, ttl_seconds),
            Backend::SharedExtension(b) => b.set(key, value, ttl_seconds),
            Backend::InMemoryBounded(b) => b.set(key, value, ttl_seconds),
            Backend::NoOp(b) => b.set(key, value, ttl_seconds),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Backend::ExternalDaemon(b) => b.get(key),
            Backend::SharedExtension(b) => b.get(key),
            Backend::InMemoryBounded(b) => b.get(key),
            Backend::NoOp(b) => b.get(key),
        }
    }

    pub fn clear(&self, key: &str) -> bool {
        match self {
            Backend::ExternalDaemon(b) => b.clear(key),
            Backend::SharedExtension(b) => b.clear(key),
            Backend::InMemoryBounded(b) => b.clear(key),
            Backend::NoOp(b) => b.clear(key),
        }
    }

    /// Capacity of the bounded store; `None` for every other strategy.
    pub fn memory_cache_size(&self) -> Option<usize> {
        match self {
            Backend::InMemoryBounded(b) => Some(b.capacity()),
            _ => None,
        }
    }

    /// Store statistics; only the bounded store keeps any.
    pub fn stats(&self) -> Option<CacheStats> {
        match self {
            Backend::InMemoryBounded(b) => Some(b.stats()),
            _ => None,
        }
    }

    /// Reclaims expired entries held locally; remote strategies expire on
    /// their own and report zero.
    pub fn purge_expired(&self) -> usize {
        match self {
            Backend::InMemoryBounded(b) => b.purge_expired(),
            _ => 0,
        }
    }
}

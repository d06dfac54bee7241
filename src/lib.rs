//! Memo Cache - A pluggable request cache
//!
//! One store/fetch/invalidate contract over an external memcache-like
//! daemon, a host shared-memory extension, a bounded in-process store with
//! TTL expiration and FIFO eviction, or a no-op strategy.

pub mod api;
pub mod backend;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod selector;

pub use api::AppState;
pub use backend::{CacheType, DaemonClient, DaemonFamily, SharedMemory};
pub use client::MemcacheClient;
pub use config::Config;
pub use error::{CacheError, Result};
pub use facade::Cache;
pub use selector::{BackendInput, EnvironmentCapabilities};

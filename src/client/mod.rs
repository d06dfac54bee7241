//! Client Module
//!
//! Concrete handles for external caching daemons.

mod memcache;

pub use memcache::{MemcacheClient, MAX_KEY_LENGTH, MAX_VALUE_LENGTH};

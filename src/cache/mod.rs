//! Cache Module
//!
//! Bounded in-process storage with lazy TTL expiration and FIFO eviction.

mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fifo::FifoTracker;
pub use stats::CacheStats;
pub use store::BoundedStore;

// == Public Constants ==
/// Capacity of the memory backend when none is configured
pub const DEFAULT_MEMORY_CACHE_SIZE: usize = 1000;

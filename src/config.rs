//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::DaemonClient;
use crate::cache::DEFAULT_MEMORY_CACHE_SIZE;
use crate::client::MemcacheClient;
use crate::selector::BackendInput;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend token; `None` autodetects
    pub backend: Option<String>,
    /// Address of a memcached daemon; when set it takes precedence over `backend`
    pub memcache_addr: Option<String>,
    /// Connect/read/write timeout for the daemon, in milliseconds
    pub memcache_timeout_ms: u64,
    /// Capacity of the bounded memory store
    pub memory_cache_size: usize,
    /// TTL in seconds for writes that do not name one
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `nocache` (default: autodetect)
    /// - `MEMCACHE_ADDR` - `host:port` of a memcached daemon (default: unset)
    /// - `MEMCACHE_TIMEOUT_MS` - daemon I/O timeout (default: 500)
    /// - `MEMORY_CACHE_SIZE` - bounded store capacity (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: non_empty_var("CACHE_BACKEND"),
            memcache_addr: non_empty_var("MEMCACHE_ADDR"),
            memcache_timeout_ms: parsed_var("MEMCACHE_TIMEOUT_MS")
                .unwrap_or(defaults.memcache_timeout_ms),
            memory_cache_size: parsed_var("MEMORY_CACHE_SIZE")
                .unwrap_or(defaults.memory_cache_size),
            default_ttl: parsed_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Builds the selector input described by this configuration.
    ///
    /// Token validation happens in the selector, so a bad `CACHE_BACKEND`
    /// still fails at cache construction.
    pub fn backend_input(&self) -> BackendInput {
        if let Some(addr) = &self.memcache_addr {
            let client: Arc<dyn DaemonClient> = Arc::new(MemcacheClient::new(
                addr.clone(),
                Duration::from_millis(self.memcache_timeout_ms.max(1)),
            ));
            return BackendInput::Client(client);
        }

        match &self.backend {
            Some(name) => BackendInput::Named(name.clone()),
            None => BackendInput::Auto,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: None,
            memcache_addr: None,
            memcache_timeout_ms: 500,
            memory_cache_size: DEFAULT_MEMORY_CACHE_SIZE,
            default_ttl: 300,
            server_port: 3000,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

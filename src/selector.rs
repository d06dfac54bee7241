//! Backend Selection
//!
//! Resolves construction input into exactly one [`Backend`]. Selection runs
//! once, at construction; an unrecognized input fails here and never on a
//! later cache call.

use std::sync::Arc;

use tracing::info;

use crate::backend::{
    Backend, DaemonClient, ExternalDaemonBackend, InMemoryBoundedBackend, NoOpBackend,
    SharedExtensionBackend, SharedMemory,
};
use crate::error::{CacheError, Result};

/// Token selecting the bounded in-process store
pub const MEMORY_TOKEN: &str = "memory";

/// Token disabling caching
pub const NOCACHE_TOKEN: &str = "nocache";

// == Backend Input ==
/// What the caller asked for when constructing a cache.
#[derive(Debug, Clone, Default)]
pub enum BackendInput {
    /// Probe the environment for a shared-memory extension, falling back to
    /// the bounded memory store.
    #[default]
    Auto,
    /// A configuration token, `"memory"` or `"nocache"`.
    Named(String),
    /// A pre-existing external daemon handle.
    Client(Arc<dyn DaemonClient>),
}

impl From<&str> for BackendInput {
    fn from(name: &str) -> Self {
        BackendInput::Named(name.to_string())
    }
}

impl From<String> for BackendInput {
    fn from(name: String) -> Self {
        BackendInput::Named(name)
    }
}

impl From<Arc<dyn DaemonClient>> for BackendInput {
    fn from(client: Arc<dyn DaemonClient>) -> Self {
        BackendInput::Client(client)
    }
}

// == Environment Capabilities ==
/// What the host runtime offers to the cache.
///
/// Autodetection is a pure function of this value, so tests describe the
/// environment instead of depending on ambient process state.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCapabilities {
    shared_memory: Option<Arc<dyn SharedMemory>>,
}

impl EnvironmentCapabilities {
    /// An environment with no optional extensions.
    pub fn none() -> Self {
        Self::default()
    }

    /// An environment exposing a shared-memory extension.
    pub fn with_shared_memory(segment: Arc<dyn SharedMemory>) -> Self {
        Self {
            shared_memory: Some(segment),
        }
    }

    pub fn has_shared_memory(&self) -> bool {
        self.shared_memory.is_some()
    }
}

// == Select ==
/// Resolves `input` into a backend.
///
/// `memory_capacity` sizes the bounded store whenever it is chosen,
/// explicitly or as the autodetection fallback.
pub fn select(
    input: BackendInput,
    env: &EnvironmentCapabilities,
    memory_capacity: usize,
) -> Result<Backend> {
    let backend = match input {
        BackendInput::Client(client) => Backend::ExternalDaemon(ExternalDaemonBackend::new(client)),
        BackendInput::Named(name) => match name.as_str() {
            MEMORY_TOKEN => Backend::InMemoryBounded(InMemoryBoundedBackend::new(memory_capacity)?),
            NOCACHE_TOKEN => Backend::NoOp(NoOpBackend),
            other => {
                return Err(CacheError::Configuration(format!(
                    "unrecognized cache backend {other:?}, expected {MEMORY_TOKEN:?} or {NOCACHE_TOKEN:?}"
                )))
            }
        },
        BackendInput::Auto => match &env.shared_memory {
            Some(segment) => {
                Backend::SharedExtension(SharedExtensionBackend::new(Arc::clone(segment)))
            }
            None => Backend::InMemoryBounded(InMemoryBoundedBackend::new(memory_capacity)?),
        },
    };

    info!(cache_type = %backend.cache_type(), "cache backend selected");
    Ok(backend)
}

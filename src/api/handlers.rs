//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{CacheError, Result};
use crate::facade::Cache;
use crate::models::{
    ClearResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache facade
    pub cache: Arc<Cache>,
    /// TTL in seconds for writes that do not name one
    pub default_ttl: u64,
}

impl AppState {
    pub fn new(cache: Cache, default_ttl: u64) -> Self {
        Self {
            cache: Arc::new(cache),
            default_ttl,
        }
    }

    /// Runs a cache call off the async workers; the daemon backend may block
    /// on network I/O.
    async fn with_cache<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Cache) -> T + Send + 'static,
        T: Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || op(&cache))
            .await
            .map_err(|err| CacheError::Internal(format!("cache task failed: {err}")))
    }
}

/// Handler for PUT /set
///
/// Stores any JSON value; `stored` reports whether the backend accepted it.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let key = req.key.clone();
    let stored = state
        .with_cache(move |cache| cache.set(&req.key, req.value, ttl))
        .await?;

    Ok(Json(SetResponse::new(key, stored)))
}

/// Handler for GET /get/:key
///
/// A miss is a 404; a cached `false` or `null` is a 200.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let lookup = key.clone();
    match state.with_cache(move |cache| cache.get(&lookup)).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ClearResponse>> {
    let target = key.clone();
    let removed = state.with_cache(move |cache| cache.clear(&target)).await?;

    Ok(Json(ClearResponse::new(key, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = &state.cache;
    Json(StatsResponse::new(
        cache.cache_type(),
        cache.memory_cache_size(),
        cache.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.cache_type()))
}

//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::backend::CacheType;
use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
///
/// `stored` is false when the active backend rejected or failed the write.
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub key: String,
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        Self {
            key: key.into(),
            stored,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub key: String,
    /// Whether an entry existed and was removed
    pub removed: bool,
}

impl ClearResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
///
/// Counters are present only for the bounded memory backend.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Active strategy label
    pub cache_type: CacheType,
    /// Capacity of the bounded store, null for other strategies
    pub memory_cache_size: Option<usize>,
    #[serde(flatten)]
    pub counters: Option<CounterSnapshot>,
}

/// Bounded-store counters with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct CounterSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(
        cache_type: CacheType,
        memory_cache_size: Option<usize>,
        stats: Option<CacheStats>,
    ) -> Self {
        let counters = stats.map(|stats| CounterSnapshot {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        });

        Self {
            cache_type,
            memory_cache_size,
            counters,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active strategy label
    pub cache_type: CacheType,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_type: CacheType) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_type,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", json!(false));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"key": "test_key", "value": false}));
    }

    #[test]
    fn test_set_response_serialize() {
        let json = serde_json::to_value(SetResponse::new("my_key", false)).unwrap();
        assert_eq!(json, json!({"key": "my_key", "stored": false}));
    }

    #[test]
    fn test_clear_response_serialize() {
        let json = serde_json::to_value(ClearResponse::new("deleted_key", true)).unwrap();
        assert_eq!(json["removed"], json!(true));
    }

    #[test]
    fn test_stats_response_memory() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            expirations: 1,
            total_entries: 100,
        };
        let resp = StatsResponse::new(CacheType::Memory, Some(100), Some(stats));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["cache_type"], json!("memory"));
        assert_eq!(json["memory_cache_size"], json!(100));
        assert_eq!(json["evictions"], json!(5));
        assert!((json["hit_rate"].as_f64().unwrap() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_without_counters() {
        let resp = StatsResponse::new(CacheType::NoCache, None, None);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json, json!({"cache_type": "nocache", "memory_cache_size": null}));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(CacheType::Memory);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("memory"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}

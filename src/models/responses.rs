//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
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

/// Response body for PUT /set and POST /add
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Outcome message
    pub message: String,
    /// The key that was written
    pub key: String,
    /// Whether the backend stored the value
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' was not stored", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for POST /inc/:key and POST /dec/:key
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub key: String,
    /// New value, null when the backend refused
    pub value: Option<i64>,
    pub succeeded: bool,
}

impl CounterResponse {
    pub fn new(key: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            key: key.into(),
            value,
            succeeded: value.is_some(),
        }
    }
}

/// Response body for DELETE /del/*search
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key, wildcard search or pattern that was deleted
    pub search: String,
    /// Number of entries removed
    pub deleted: usize,
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Response body for GET /stats
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsResponse {
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Current number of entries in cache
    pub items: u64,
    /// Seconds the cache has been active
    pub uptime: u64,
    /// Whether the statistics describe a local cache
    pub is_local: bool,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(hits: u64, misses: u64, items: u64, uptime: u64, is_local: bool) -> Self {
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            items,
            uptime,
            is_local,
            hit_rate,
        }
    }
}

/// Response body for GET /meminfo
#[derive(Debug, Clone, Serialize)]
pub struct MemoryResponse {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    /// Percentage of memory in use, null when total is zero
    pub used_percent: Option<f64>,
    pub overhead: u64,
    pub used_blocks: u64,
    pub free_blocks: u64,
}

/// Response body for GET /ttl and PUT /ttl
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub default_ttl: i64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

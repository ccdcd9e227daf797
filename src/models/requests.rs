//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for PUT /set and POST /add
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Request body for POST /inc/:key and POST /dec/:key
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRequest {
    /// Step size, 1 when omitted
    #[serde(default)]
    pub by: Option<i64>,
}

impl CounterRequest {
    pub fn step(&self) -> i64 {
        self.by.unwrap_or(1)
    }
}

/// Request body for PUT /ttl
#[derive(Debug, Clone, Deserialize)]
pub struct TtlRequest {
    /// New default TTL in seconds
    pub default_ttl: i64,
}

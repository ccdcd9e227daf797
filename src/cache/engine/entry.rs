//! Stored Entry Module
//!
//! A single value held by the in-memory engine, with TTL and usage metadata.

use chrono::Utc;
use serde_json::Value;

use crate::cache::CacheEntryDescriptor;

/// Fixed bookkeeping cost charged to every entry, in bytes.
pub const ENTRY_OVERHEAD: u64 = 64;

// == Stored Entry ==
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored value
    pub value: Value,
    /// TTL the entry was stored with, 0 = never expires
    pub ttl_seconds: u64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
    /// Number of reads served by this entry
    pub hitcount: u64,
    /// Engine tick of the last write or read, for LRU eviction
    pub last_used: u64,
    /// Serialized size of the value in bytes
    pub value_size: u64,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates an entry. A TTL of zero or less never expires.
    pub fn new(value: Value, ttl: i64, tick: u64) -> Self {
        let now = current_timestamp_ms();
        let ttl_seconds = ttl.max(0) as u64;
        let expires_at = (ttl > 0).then(|| now.saturating_add(ttl.saturating_mul(1000)));
        let value_size = value_size(&value);

        Self {
            value,
            ttl_seconds,
            created_at: now,
            expires_at,
            hitcount: 0,
            last_used: tick,
            value_size,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        matches!(self.expires_at, Some(expires) if now_ms >= expires)
    }

    /// Replaces the value in place, keeping TTL and hit count.
    pub fn replace_value(&mut self, value: Value, tick: u64) {
        self.value_size = value_size(&value);
        self.value = value;
        self.last_used = tick;
    }

    /// Bytes this entry occupies in the engine's budget.
    pub fn footprint(&self, key: &str) -> u64 {
        footprint(key, self.value_size)
    }

    /// Describes the entry for the engine's info listing.
    pub fn describe(&self, key: &str) -> CacheEntryDescriptor {
        let age_ms = current_timestamp_ms().saturating_sub(self.created_at).max(0);
        CacheEntryDescriptor {
            key_name: key.to_string(),
            value_type: value_type(&self.value).to_string(),
            value_size: self.value_size,
            ttl_seconds: self.ttl_seconds,
            age_seconds: (age_ms / 1000) as u64,
            hitcount: self.hitcount,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Bytes charged for a key holding a value of `value_size` bytes.
pub fn footprint(key: &str, value_size: u64) -> u64 {
    key.len() as u64 + value_size + ENTRY_OVERHEAD
}

fn value_size(value: &Value) -> u64 {
    value.to_string().len() as u64
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "long",
        Value::Number(_) => "double",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

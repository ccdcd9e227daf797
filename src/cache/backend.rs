//! Cache Backend Module
//!
//! The primitive operations the facade expects from the underlying cache
//! engine, plus the statistics records that engine reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Entry Descriptor ==
/// Per-entry metadata reported by the engine's info call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryDescriptor {
    /// The key the entry is stored under
    pub key_name: String,
    /// JSON type name of the stored value
    pub value_type: String,
    /// Approximate size of the stored value in bytes
    pub value_size: u64,
    /// TTL the entry was stored with, 0 = never expires
    pub ttl_seconds: u64,
    /// Seconds since the entry was stored
    pub age_seconds: u64,
    /// Number of times the entry was served
    pub hitcount: u64,
}

// == Store Info ==
/// Result of the engine's info call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Seconds the cache has been active
    pub total_cache_uptime: u64,
    /// Whether the metadata describes a local (not global) cache instance
    pub is_local_cache: bool,
    /// Number of live entries
    pub total_item_count: u64,
    /// Number of reads served from the cache
    pub total_hit_count: u64,
    /// Number of reads that found nothing
    pub total_miss_count: u64,
    /// Entry listing; absent for summary-only requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucache_entries: Option<Vec<CacheEntryDescriptor>>,
}

// == Memory Info ==
/// Result of the engine's meminfo call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemInfo {
    /// Bytes allocated for the user cache
    pub memory_total: u64,
    /// Bytes still available
    pub memory_free: u64,
    /// Number of used memory blocks
    pub num_used_blks: u64,
    /// Number of free memory blocks
    pub num_free_blks: u64,
    /// Bytes used by internal structures
    pub memory_overhead: u64,
}

// == Cache Backend ==
/// Primitive operations of an external cache engine.
///
/// Each call is expected to be atomic on the engine side. In particular
/// `add`, `increment` and `decrement` must not race with other writers.
/// TTLs are in seconds and passed through unvalidated.
pub trait CacheBackend: Send + Sync {
    /// Capability probe used once when a facade is constructed.
    fn is_available(&self) -> bool;

    /// Stores `value` under `key`, replacing any existing entry.
    fn set(&self, key: &str, value: Value, ttl: i64) -> bool;

    /// Stores `value` only if `key` is not present.
    fn add(&self, key: &str, value: Value, ttl: i64) -> bool;

    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Deletes every listed key and returns how many were removed.
    fn delete(&self, keys: &[String]) -> usize;

    /// Checks whether `key` holds a live entry.
    fn exists(&self, key: &str) -> bool;

    /// Adds `by` to a numeric entry and returns the new value.
    fn increment(&self, key: &str, by: i64) -> Option<i64>;

    /// Subtracts `by` from a numeric entry and returns the new value.
    fn decrement(&self, key: &str, by: i64) -> Option<i64>;

    /// Removes every entry.
    fn clear(&self) -> bool;

    /// Reports counters and, unless `summary_only`, the entry listing.
    /// With `key` set the listing is restricted to that entry.
    fn info(&self, summary_only: bool, key: Option<&str>) -> Option<StoreInfo>;

    /// Reports memory usage.
    fn meminfo(&self) -> Option<MemInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_info_omits_entries_field() {
        let info = StoreInfo {
            total_item_count: 3,
            ..StoreInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("ucache_entries").is_none());
        assert_eq!(json["total_item_count"], 3);
    }

    #[test]
    fn test_info_without_entries_deserializes() {
        let json = r#"{
            "total_cache_uptime": 10,
            "is_local_cache": false,
            "total_item_count": 0,
            "total_hit_count": 0,
            "total_miss_count": 0
        }"#;
        let info: StoreInfo = serde_json::from_str(json).unwrap();
        assert!(info.ucache_entries.is_none());
    }
}

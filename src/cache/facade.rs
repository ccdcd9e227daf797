//! User Cache Facade
//!
//! The public operation surface. Every call goes to the backing engine;
//! mutations that change something drop the cached statistics so the next
//! statistics read fetches fresh ones.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{
    CacheBackend, CacheEntryDescriptor, KeyResolver, KeyTarget, MemInfo, StatsCache, StoreInfo,
    DEFAULT_DELIMITER,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == User Cache ==
/// Facade over a [`CacheBackend`].
///
/// One instance is meant to be shared by every caller in the process, so
/// all methods take `&self`. Wrap it in an `Arc` to hand it around.
#[derive(Debug)]
pub struct UserCache<B> {
    backend: B,
    stats: StatsCache,
    resolver: KeyResolver,
    default_ttl: AtomicI64,
}

impl<B: CacheBackend> UserCache<B> {
    // == Constructors ==
    /// Wraps `backend`, failing if it does not answer the capability probe.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_delimiter(backend, DEFAULT_DELIMITER)
    }

    /// Like [`UserCache::new`] with a custom pattern delimiter.
    pub fn with_delimiter(backend: B, delimiter: char) -> Result<Self> {
        if !backend.is_available() {
            return Err(CacheError::StoreUnavailable(
                "capability probe failed".to_string(),
            ));
        }

        info!(delimiter = %delimiter, "User cache attached to backend");
        Ok(Self {
            backend,
            stats: StatsCache::new(),
            resolver: KeyResolver::new(delimiter),
            default_ttl: AtomicI64::new(0),
        })
    }

    /// Builds a facade using the delimiter and default TTL from `config`.
    pub fn from_config(backend: B, config: &Config) -> Result<Self> {
        let cache = Self::with_delimiter(backend, config.pattern_delimiter)?;
        cache.set_default_ttl(config.default_ttl);
        Ok(cache)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // == Default TTL ==
    /// TTL in seconds used by [`UserCache::set`] when none is given.
    pub fn default_ttl(&self) -> i64 {
        self.default_ttl.load(Ordering::Relaxed)
    }

    /// Negative values are passed through to the backend as-is.
    pub fn set_default_ttl(&self, ttl: i64) {
        self.default_ttl.store(ttl, Ordering::Relaxed);
    }

    // == Writes ==
    /// Stores `value` under `key`, using the default TTL when `ttl` is None.
    pub fn set(&self, key: &str, value: impl Into<Value>, ttl: Option<i64>) -> bool {
        let ttl = ttl.unwrap_or_else(|| self.default_ttl());
        let stored = self.backend.set(key, value.into(), ttl);
        self.invalidate_if(stored)
    }

    /// Stores `value` only if `key` is absent. A missing `ttl` means no
    /// expiration; the default TTL does not apply here.
    pub fn add(&self, key: &str, value: impl Into<Value>, ttl: Option<i64>) -> bool {
        let added = self.backend.add(key, value.into(), ttl.unwrap_or(0));
        self.invalidate_if(added)
    }

    /// Adds `by` to a numeric entry. Returns the new value, or None if the
    /// backend refused.
    pub fn inc(&self, key: &str, by: i64) -> Option<i64> {
        let result = self.backend.increment(key, by);
        self.invalidate_if(result.is_some());
        result
    }

    /// Subtracts `by` from a numeric entry. Returns the new value, or None
    /// if the backend refused.
    pub fn dec(&self, key: &str, by: i64) -> Option<i64> {
        let result = self.backend.decrement(key, by);
        self.invalidate_if(result.is_some());
        result
    }

    /// Deletes by literal key, wildcard search or delimited pattern.
    ///
    /// A pattern that matches no key falls back to deleting the search
    /// string itself as a literal key. Returns the number of entries
    /// removed.
    pub fn delete(&self, search: &str) -> usize {
        let keys = match self.resolver.resolve(search, || self.entries()) {
            KeyTarget::Many(keys) if !keys.is_empty() => keys,
            _ => vec![search.to_string()],
        };

        let deleted = self.backend.delete(&keys);
        debug!(search, targeted = keys.len(), deleted, "Delete resolved");
        self.invalidate_if(deleted > 0);
        deleted
    }

    /// Removes every entry.
    pub fn clear(&self) -> bool {
        let cleared = self.backend.clear();
        self.invalidate_if(cleared)
    }

    // == Reads ==
    /// Returns the value under `key`, or None when it is not found.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.backend.get(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.backend.exists(key)
    }

    /// Uncached pass-through to the backend's info call.
    pub fn info(&self, summary_only: bool, key: Option<&str>) -> Option<StoreInfo> {
        self.backend.info(summary_only, key)
    }

    /// Uncached pass-through to the backend's meminfo call.
    pub fn mem_info(&self) -> Option<MemInfo> {
        self.backend.meminfo()
    }

    // == Statistics ==
    /// Drops both statistics snapshots.
    pub fn invalidate_statistics(&self) {
        debug!("Statistics snapshots invalidated");
        self.stats.invalidate();
    }

    /// Cached entry snapshot, fetched on first use after an invalidation.
    pub fn info_snapshot(&self) -> Option<Arc<StoreInfo>> {
        self.stats.info(|| self.backend.info(false, None))
    }

    /// Cached memory snapshot, fetched on first use after an invalidation.
    pub fn mem_snapshot(&self) -> Option<Arc<MemInfo>> {
        self.stats.mem_info(|| self.backend.meminfo())
    }

    /// Entry descriptors from the cached entry snapshot.
    pub fn entries(&self) -> Vec<CacheEntryDescriptor> {
        self.stats.entries(|| self.backend.info(false, None))
    }

    pub fn total_hit_count(&self) -> Option<u64> {
        self.info_snapshot().map(|info| info.total_hit_count)
    }

    pub fn total_item_count(&self) -> Option<u64> {
        self.info_snapshot().map(|info| info.total_item_count)
    }

    pub fn total_miss_count(&self) -> Option<u64> {
        self.info_snapshot().map(|info| info.total_miss_count)
    }

    /// Seconds the cache has been active.
    pub fn total_uptime(&self) -> Option<u64> {
        self.info_snapshot().map(|info| info.total_cache_uptime)
    }

    /// True when the statistics describe a local rather than global cache.
    pub fn is_local_cache(&self) -> Option<bool> {
        self.info_snapshot().map(|info| info.is_local_cache)
    }

    pub fn memory_free(&self) -> Option<u64> {
        self.mem_snapshot().map(|mem| mem.memory_free)
    }

    pub fn memory_total(&self) -> Option<u64> {
        self.mem_snapshot().map(|mem| mem.memory_total)
    }

    pub fn memory_overhead(&self) -> Option<u64> {
        self.mem_snapshot().map(|mem| mem.memory_overhead)
    }

    pub fn memory_free_blocks(&self) -> Option<u64> {
        self.mem_snapshot().map(|mem| mem.num_free_blks)
    }

    pub fn memory_used_blocks(&self) -> Option<u64> {
        self.mem_snapshot().map(|mem| mem.num_used_blks)
    }

    /// Bytes in use: total minus free.
    pub fn memory_used(&self) -> Option<u64> {
        self.mem_snapshot()
            .map(|mem| mem.memory_total.saturating_sub(mem.memory_free))
    }

    /// Used memory as a percentage of total, rounded to `precision`
    /// decimals. None when the total is zero.
    pub fn memory_used_percent(&self, precision: u32) -> Option<f64> {
        let mem = self.mem_snapshot()?;
        if mem.memory_total == 0 {
            return None;
        }
        let used = mem.memory_total.saturating_sub(mem.memory_free);
        Some(round_to(
            used as f64 / mem.memory_total as f64 * 100.0,
            precision,
        ))
    }

    fn invalidate_if(&self, changed: bool) -> bool {
        if changed {
            self.invalidate_statistics();
        }
        changed
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision.min(15) as i32);
    (value * scale).round() / scale
}

//! Statistics Snapshot Module
//!
//! Holds the last entry listing and memory report fetched from the engine
//! so derived statistics do not query the engine on every read.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{CacheEntryDescriptor, MemInfo, StoreInfo};

// == Snapshot Slot ==
/// One lazily populated snapshot.
///
/// Population runs under the write lock so concurrent readers see either
/// no snapshot or a complete one.
#[derive(Debug)]
struct Slot<T> {
    name: &'static str,
    data: RwLock<Option<Arc<T>>>,
}

impl<T> Slot<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            data: RwLock::new(None),
        }
    }

    /// Returns the cached snapshot or fetches a new one.
    ///
    /// A fetched value is kept only when `complete` accepts it. Incomplete
    /// values are still returned to the caller, and the next read fetches
    /// again.
    fn get_or_fetch<F, C>(&self, fetch: F, complete: C) -> Option<Arc<T>>
    where
        F: FnOnce() -> Option<T>,
        C: Fn(&T) -> bool,
    {
        if let Some(cached) = self.data.read().clone() {
            return Some(cached);
        }

        let mut slot = self.data.write();
        if let Some(cached) = slot.as_ref() {
            return Some(Arc::clone(cached));
        }

        let fetched = fetch().map(Arc::new);
        match &fetched {
            Some(value) if complete(value) => {
                debug!(snapshot = self.name, "Statistics snapshot populated");
                *slot = Some(Arc::clone(value));
            }
            _ => debug!(snapshot = self.name, "Statistics fetch incomplete, not cached"),
        }
        fetched
    }

    fn clear(&self) {
        *self.data.write() = None;
    }

    fn is_populated(&self) -> bool {
        self.data.read().is_some()
    }
}

// == Statistics Cache ==
/// Lazily populated holder for the engine's info and meminfo reports.
#[derive(Debug)]
pub struct StatsCache {
    info: Slot<StoreInfo>,
    mem_info: Slot<MemInfo>,
}

impl StatsCache {
    // == Constructor ==
    /// Creates a cache with both snapshots unpopulated.
    pub fn new() -> Self {
        Self {
            info: Slot::new("info"),
            mem_info: Slot::new("mem_info"),
        }
    }

    /// Returns the entry snapshot, calling `fetch` only if none is cached.
    ///
    /// The snapshot counts as populated once it carries an entry listing.
    pub fn info<F>(&self, fetch: F) -> Option<Arc<StoreInfo>>
    where
        F: FnOnce() -> Option<StoreInfo>,
    {
        self.info
            .get_or_fetch(fetch, |info| info.ucache_entries.is_some())
    }

    /// Returns the memory snapshot, calling `fetch` only if none is cached.
    pub fn mem_info<F>(&self, fetch: F) -> Option<Arc<MemInfo>>
    where
        F: FnOnce() -> Option<MemInfo>,
    {
        self.mem_info.get_or_fetch(fetch, |_| true)
    }

    /// Entry listing from the entry snapshot, empty if there is none.
    pub fn entries<F>(&self, fetch: F) -> Vec<CacheEntryDescriptor>
    where
        F: FnOnce() -> Option<StoreInfo>,
    {
        self.info(fetch)
            .and_then(|info| info.ucache_entries.clone())
            .unwrap_or_default()
    }

    // == Invalidate ==
    /// Drops both snapshots. Idempotent.
    pub fn invalidate(&self) {
        self.info.clear();
        self.mem_info.clear();
    }

    pub fn has_info(&self) -> bool {
        self.info.is_populated()
    }

    pub fn has_mem_info(&self) -> bool {
        self.mem_info.is_populated()
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn listing(keys: &[&str]) -> StoreInfo {
        StoreInfo {
            total_item_count: keys.len() as u64,
            ucache_entries: Some(
                keys.iter()
                    .map(|k| CacheEntryDescriptor {
                        key_name: k.to_string(),
                        value_type: "number".to_string(),
                        value_size: 8,
                        ttl_seconds: 0,
                        age_seconds: 0,
                        hitcount: 0,
                    })
                    .collect(),
            ),
            ..StoreInfo::default()
        }
    }

    #[test]
    fn test_new_cache_is_unpopulated() {
        let stats = StatsCache::new();
        assert!(!stats.has_info());
        assert!(!stats.has_mem_info());
    }

    #[test]
    fn test_consecutive_reads_fetch_once() {
        let stats = StatsCache::new();
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Some(listing(&["a"]))
        };

        stats.info(fetch);
        stats.info(fetch);
        stats.entries(fetch);

        assert_eq!(fetches.get(), 1);
        assert!(stats.has_info());
    }

    #[test]
    fn test_invalidate_forces_one_refetch() {
        let stats = StatsCache::new();
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Some(listing(&["a"]))
        };

        stats.info(fetch);
        stats.invalidate();
        assert!(!stats.has_info());

        stats.info(fetch);
        stats.info(fetch);
        assert_eq!(fetches.get(), 2);
    }

    #[test]
    fn test_info_without_listing_is_not_cached() {
        let stats = StatsCache::new();
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Some(StoreInfo {
                total_hit_count: 4,
                ..StoreInfo::default()
            })
        };

        let first = stats.info(fetch).unwrap();
        assert_eq!(first.total_hit_count, 4);
        assert!(stats.entries(fetch).is_empty());
        assert!(!stats.has_info());
        assert_eq!(fetches.get(), 2);
    }

    #[test]
    fn test_failed_fetch_yields_nothing() {
        let stats = StatsCache::new();
        assert!(stats.info(|| None).is_none());
        assert!(stats.entries(|| None).is_empty());
        assert!(stats.mem_info(|| None).is_none());
    }

    #[test]
    fn test_mem_info_cached_until_invalidated() {
        let stats = StatsCache::new();
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Some(MemInfo {
                memory_total: 1000,
                memory_free: 250,
                ..MemInfo::default()
            })
        };

        assert_eq!(stats.mem_info(fetch).unwrap().memory_free, 250);
        stats.mem_info(fetch);
        assert_eq!(fetches.get(), 1);

        stats.invalidate();
        stats.invalidate();
        stats.mem_info(fetch);
        assert_eq!(fetches.get(), 2);
    }

    #[test]
    fn test_entries_keep_listing_order() {
        let stats = StatsCache::new();
        let keys: Vec<String> = stats
            .entries(|| Some(listing(&["b", "a", "c"])))
            .into_iter()
            .map(|e| e.key_name)
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}

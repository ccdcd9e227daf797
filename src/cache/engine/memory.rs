//! Memory Engine Module
//!
//! A process-local cache engine: BTreeMap storage with TTL expiration, LRU
//! eviction under an entry cap and a byte budget, and hit/miss counters.

use std::collections::BTreeMap;
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use super::entry::{footprint, StoredEntry, ENTRY_OVERHEAD};
use crate::cache::{CacheBackend, MemInfo, StoreInfo, MAX_KEY_LENGTH};

// == Engine State ==
#[derive(Debug, Default)]
struct EngineState {
    entries: BTreeMap<String, StoredEntry>,
    memory_used: u64,
    hits: u64,
    misses: u64,
    tick: u64,
}

impl EngineState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Looks up a live entry, dropping it first if it has expired.
    fn live_mut(&mut self, key: &str) -> Option<&mut StoredEntry> {
        if self.entries.get(key)?.is_expired() {
            self.remove(key);
            return None;
        }
        self.entries.get_mut(key)
    }

    fn remove(&mut self, key: &str) -> Option<StoredEntry> {
        let entry = self.entries.remove(key)?;
        self.memory_used = self.memory_used.saturating_sub(entry.footprint(key));
        Some(entry)
    }

    fn insert(&mut self, key: &str, entry: StoredEntry) {
        self.memory_used += entry.footprint(key);
        self.entries.insert(key.to_string(), entry);
    }

    /// Picks the eviction victim, never `keep`.
    fn least_recently_used(&self, keep: &str) -> Option<String> {
        self.entries
            .iter()
            .filter(|(key, _)| key.as_str() != keep)
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())
    }
}

// == Memory Engine ==
/// In-memory implementation of [`CacheBackend`].
///
/// All state sits behind one mutex, so every primitive is atomic.
#[derive(Debug)]
pub struct MemoryEngine {
    state: Mutex<EngineState>,
    max_entries: usize,
    memory_limit: u64,
    started: Instant,
}

impl MemoryEngine {
    // == Constructor ==
    /// Creates an engine holding at most `max_entries` entries within
    /// `memory_limit` bytes.
    pub fn new(max_entries: usize, memory_limit: u64) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            max_entries,
            memory_limit,
            started: Instant::now(),
        }
    }

    /// Creates an engine from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_entries, config.memory_limit)
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.lock();
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.remove(key);
        }
        expired.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores an entry, evicting least recently used entries to make room.
    ///
    /// With `only_if_absent` a live entry under `key` makes the call fail.
    fn store(&self, key: &str, value: Value, ttl: i64, only_if_absent: bool) -> bool {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return false;
        }

        let mut state = self.state.lock();
        if only_if_absent && state.live_mut(key).is_some() {
            return false;
        }

        let tick = state.next_tick();
        let entry = StoredEntry::new(value, ttl, tick);
        let needed = entry.footprint(key);
        if needed > self.memory_limit || self.max_entries == 0 {
            return false;
        }

        // The write can no longer fail, so the old entry may go.
        state.remove(key);
        while state.entries.len() >= self.max_entries
            || state.memory_used + needed > self.memory_limit
        {
            let Some(victim) = state.least_recently_used(key) else {
                break;
            };
            state.remove(&victim);
            debug!(key = %victim, "Evicted least recently used entry");
        }

        state.insert(key, entry);
        true
    }

    /// Applies `delta` to a numeric entry.
    ///
    /// A value that grows is made to fit the byte budget by evicting other
    /// entries; if it cannot fit even alone the update is refused.
    fn adjust(&self, key: &str, delta: Option<i64>) -> Option<i64> {
        let delta = delta?;
        let mut state = self.state.lock();
        let tick = state.next_tick();
        let entry = state.live_mut(key)?;
        let updated = Value::from(entry.value.as_i64()?.checked_add(delta)?);

        let before = entry.footprint(key);
        let after = footprint(key, updated.to_string().len() as u64);
        if after > self.memory_limit {
            return None;
        }

        while state.memory_used - before + after > self.memory_limit {
            let Some(victim) = state.least_recently_used(key) else {
                return None;
            };
            state.remove(&victim);
            debug!(key = %victim, "Evicted least recently used entry");
        }

        let entry = state.entries.get_mut(key)?;
        entry.replace_value(updated.clone(), tick);
        state.memory_used = state.memory_used - before + after;
        updated.as_i64()
    }
}

impl CacheBackend for MemoryEngine {
    fn is_available(&self) -> bool {
        true
    }

    fn set(&self, key: &str, value: Value, ttl: i64) -> bool {
        self.store(key, value, ttl, false)
    }

    fn add(&self, key: &str, value: Value, ttl: i64) -> bool {
        self.store(key, value, ttl, true)
    }

    fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock();
        let tick = state.next_tick();
        let found = state.live_mut(key).map(|entry| {
            entry.hitcount += 1;
            entry.last_used = tick;
            entry.value.clone()
        });

        match found {
            Some(_) => state.hits += 1,
            None => state.misses += 1,
        }
        found
    }

    fn delete(&self, keys: &[String]) -> usize {
        let mut state = self.state.lock();
        keys.iter()
            .filter(|key| {
                state
                    .remove(key)
                    .map(|entry| !entry.is_expired())
                    .unwrap_or(false)
            })
            .count()
    }

    fn exists(&self, key: &str) -> bool {
        self.state
            .lock()
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    fn increment(&self, key: &str, by: i64) -> Option<i64> {
        self.adjust(key, Some(by))
    }

    fn decrement(&self, key: &str, by: i64) -> Option<i64> {
        self.adjust(key, by.checked_neg())
    }

    fn clear(&self) -> bool {
        let mut state = self.state.lock();
        state.entries.clear();
        state.memory_used = 0;
        true
    }

    fn info(&self, summary_only: bool, key: Option<&str>) -> Option<StoreInfo> {
        let state = self.state.lock();
        let entries = &state.entries;
        let live = || entries.iter().filter(|(_, entry)| !entry.is_expired());

        let ucache_entries = (!summary_only).then(|| {
            live()
                .filter(|(name, _)| key.map_or(true, |k| k == name.as_str()))
                .map(|(name, entry)| entry.describe(name))
                .collect()
        });

        Some(StoreInfo {
            total_cache_uptime: self.started.elapsed().as_secs(),
            is_local_cache: true,
            total_item_count: live().count() as u64,
            total_hit_count: state.hits,
            total_miss_count: state.misses,
            ucache_entries,
        })
    }

    fn meminfo(&self) -> Option<MemInfo> {
        let state = self.state.lock();
        let used_blocks = state.entries.len() as u64;
        Some(MemInfo {
            memory_total: self.memory_limit,
            memory_free: self.memory_limit.saturating_sub(state.memory_used),
            num_used_blks: used_blocks,
            num_free_blks: (self.max_entries as u64).saturating_sub(used_blocks),
            memory_overhead: used_blocks * ENTRY_OVERHEAD,
        })
    }
}

/// Bytes an entry with this key and value would occupy.
pub fn estimate_footprint(key: &str, value: &Value) -> u64 {
    footprint(key, value.to_string().len() as u64)
}

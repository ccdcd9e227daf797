//! Map Adapter
//!
//! Map-style access on top of a [`UserCache`].

use serde_json::Value;

use crate::cache::{CacheBackend, UserCache};
use crate::error::{CacheError, Result};

/// Borrowing map view of a [`UserCache`].
///
/// Writes always use the cache's default TTL, and `remove` accepts the same
/// searches as [`UserCache::delete`].
#[derive(Debug)]
pub struct CacheMap<'a, B> {
    cache: &'a UserCache<B>,
}

impl<'a, B: CacheBackend> CacheMap<'a, B> {
    pub fn new(cache: &'a UserCache<B>) -> Self {
        Self { cache }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cache.exists(key)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.cache.get(key)
    }

    /// Stores `value` with the default TTL. An empty key is rejected with
    /// [`CacheError::MissingKey`].
    pub fn insert(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        if key.is_empty() {
            return Err(CacheError::MissingKey);
        }
        Ok(self.cache.set(key, value, None))
    }

    /// Deletes by key or search and returns the number of entries removed.
    pub fn remove(&self, search: &str) -> usize {
        self.cache.delete(search)
    }
}

impl<B: CacheBackend> UserCache<B> {
    /// Map-style view of this cache.
    pub fn as_map(&self) -> CacheMap<'_, B> {
        CacheMap::new(self)
    }
}

//! Cache Module
//!
//! User cache facade over a pluggable cache engine, with pattern deletes
//! and lazily cached statistics.
//!
//! # API surface ([`UserCache`])
//! - `set(key, value, ttl)` - Store a value; `ttl: None` uses the default TTL
//! - `add(key, value, ttl)` - Store only if absent; `ttl: None` means no
//!   expiration, the default TTL is not applied
//! - `get`, `exists` - Read a key
//! - `inc`, `dec` - Adjust a numeric entry, `None` when refused
//! - `delete(search)` - Delete by key, wildcard or delimited pattern
//! - `clear` - Remove every entry
//!
//! Values are anything convertible into a `serde_json::Value`. TTLs are in
//! seconds, and zero or less never expires.

mod backend;
pub mod engine;
mod facade;
mod map;
mod resolver;
mod snapshot;
pub mod wildcard;


// Re-export public types
pub use backend::{CacheBackend, CacheEntryDescriptor, MemInfo, StoreInfo};
pub use engine::MemoryEngine;
pub use facade::UserCache;
pub use map::CacheMap;
pub use resolver::{KeyResolver, KeyTarget, SearchPattern, DEFAULT_DELIMITER};
pub use snapshot::StatsCache;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Default precision of the used-memory percentage
pub const DEFAULT_PERCENT_PRECISION: u32 = 2;

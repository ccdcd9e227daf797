//! ucache - A user cache facade
//!
//! Stores JSON values under string keys with optional expiration, deletes
//! by literal key, wildcard or pattern, and serves engine statistics from
//! lazily refreshed snapshots.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheBackend, CacheMap, MemoryEngine, UserCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;

//! In-memory cache engine
//!
//! A [`CacheBackend`](crate::cache::CacheBackend) that lives in the process.

mod entry;
mod memory;

pub use memory::{estimate_footprint, MemoryEngine};

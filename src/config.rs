//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-memory engine can hold
    pub max_entries: usize,
    /// Memory budget of the in-memory engine in bytes
    pub memory_limit: u64,
    /// Default TTL in seconds used by `set` when none is given, 0 = never expires
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Background purge interval in seconds
    pub cleanup_interval: u64,
    /// Leading character that marks a search string as a delimited pattern
    pub pattern_delimiter: char,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `MEMORY_LIMIT` - Memory budget in bytes (default: 16 MiB)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Purge frequency in seconds (default: 1)
    /// - `PATTERN_DELIMITER` - Pattern delimiter character (default: `/`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            memory_limit: env_or("MEMORY_LIMIT", defaults.memory_limit),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            pattern_delimiter: env_or("PATTERN_DELIMITER", defaults.pattern_delimiter),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            memory_limit: 16 * 1024 * 1024,
            default_ttl: 0,
            server_port: 3000,
            cleanup_interval: 1,
            pattern_delimiter: '/',
        }
    }
}

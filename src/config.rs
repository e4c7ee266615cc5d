//! Configuration Module
//!
//! Handles loading the load-harness configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Load harness parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of records each cache can hold
    pub capacity: usize,
    /// Total number of operations per store, split across workers
    pub operations: usize,
    /// Number of concurrent workers hammering a store
    pub workers: usize,
    /// Number of distinct keys the workload draws from
    pub key_space: usize,
    /// TTL in milliseconds for records written to the expiring cache
    pub ttl_ms: u64,
}

fn from_env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Records per cache (default: 10000)
    /// - `BENCH_OPERATIONS` - Operations per store (default: 100000)
    /// - `BENCH_WORKERS` - Concurrent workers (default: 4)
    /// - `BENCH_KEY_SPACE` - Distinct keys (default: 20000)
    /// - `BENCH_TTL_MS` - Expiring cache TTL in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: from_env_or("CACHE_CAPACITY", defaults.capacity),
            operations: from_env_or("BENCH_OPERATIONS", defaults.operations),
            workers: from_env_or("BENCH_WORKERS", defaults.workers),
            key_space: from_env_or("BENCH_KEY_SPACE", defaults.key_space),
            ttl_ms: from_env_or("BENCH_TTL_MS", defaults.ttl_ms),
        }
    }

    /// Rejects values the harness cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        if self.workers == 0 {
            return Err(CacheError::InvalidConfig(
                "workers must be greater than zero".to_string(),
            ));
        }
        if self.key_space == 0 {
            return Err(CacheError::InvalidConfig(
                "key space must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            operations: 100_000,
            workers: 4,
            key_space: 20_000,
            ttl_ms: 1_000,
        }
    }
}

//! Cache Statistics Module
//!
//! Tracks per-engine counters: hits, misses, capacity evictions and TTL expirations.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of an engine's counters.
///
/// Counters survive `clear()`; only `total_entries` reflects the current contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of `get` calls that found a live record
    pub hits: u64,
    /// Number of `get` calls on absent or expired keys
    pub misses: u64,
    /// Number of records removed to make room for a new key
    pub evictions: u64,
    /// Number of records purged by lazy expiry sweeps
    pub expirations: u64,
    /// Current number of records in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Records a lookup outcome.
    pub(crate) fn record_lookup<T>(&mut self, found: &Option<T>) {
        if found.is_some() {
            self.record_hit();
        } else {
            self.record_miss();
        }
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    /// Returns a copy stamped with the current entry count.
    pub(crate) fn snapshot(&self, total_entries: usize) -> Self {
        Self {
            total_entries,
            ..self.clone()
        }
    }
}

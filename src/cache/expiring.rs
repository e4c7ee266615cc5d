//! Expiring Cache Module
//!
//! Passive TTL expiration. Records sit in an expiry queue ordered by deadline;
//! every operation first sweeps the records whose deadline has passed. Reading
//! a record renews its deadline using the TTL it was stored with.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::arena::Handle;
use crate::cache::clock::{Clock, SystemClock};
use crate::cache::expiry_queue::ExpiryQueue;
use crate::cache::{CacheStats, MAX_TTL};
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    ttl: Duration,
}

#[derive(Debug)]
struct ExpiringState<V> {
    index: HashMap<String, Handle>,
    queue: ExpiryQueue<Entry<V>>,
    stats: CacheStats,
}

impl<V> ExpiringState<V> {
    // == Sweep ==
    /// Removes every record whose deadline is at or before `now`, nearest first.
    fn sweep(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some(entry) = self.queue.pop_expired(now) {
            self.index.remove(&entry.key);
            removed += 1;
        }

        if removed > 0 {
            self.stats.record_expirations(removed);
            trace!(removed, "expired records swept");
        }
        removed
    }

    /// Looks up a live record without sweeping.
    fn live(&self, key: &str, now: Instant) -> Option<Handle> {
        let handle = self.index.get(key).copied()?;
        let expire_at = self.queue.expire_at(handle)?;
        (expire_at > now).then_some(handle)
    }
}

// == Expiring Cache ==
/// Thread-safe, capacity-bounded cache whose records expire after a per-record TTL.
///
/// Expiry is lazy: there is no background task, expired records are purged
/// by the next operation that takes the lock. Every successful `get` renews
/// the record for another full TTL.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    capacity: usize,
    clock: Arc<dyn Clock>,
    state: Mutex<ExpiringState<V>>,
}

impl<V: Clone> ExpiringCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` records, timed by the system clock.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Creates a cache timed by the given clock.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(capacity, "expiring cache created");

        Ok(Self {
            capacity,
            clock,
            state: Mutex::new(ExpiringState {
                index: HashMap::with_capacity(capacity),
                queue: ExpiryQueue::with_capacity(capacity),
                stats: CacheStats::new(),
            }),
        })
    }

    // == Get ==
    /// Returns the value for `key` and renews its deadline to now + its TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let now = self.clock.now();
        state.sweep(now);

        let found = state.index.get(key).copied().and_then(|handle| {
            let entry = state.queue.get(handle)?;
            let (value, ttl) = (entry.value.clone(), entry.ttl);
            state.queue.reschedule(handle, now + ttl);
            Some(value)
        });
        state.stats.record_lookup(&found);
        found
    }

    // == Put ==
    /// Inserts or replaces `key` with a fresh deadline of now + `ttl`.
    ///
    /// A new key arriving at a full cache evicts the record nearest to expiry.
    /// TTLs longer than [`MAX_TTL`] are clamped.
    pub fn put(&self, key: String, value: V, ttl: Duration) {
        let ttl = ttl.min(MAX_TTL);
        let mut state = self.state.lock();
        let state = &mut *state;
        let now = self.clock.now();
        state.sweep(now);

        if let Some(handle) = state.index.get(&key).copied() {
            if let Some(entry) = state.queue.get_mut(handle) {
                entry.value = value;
                entry.ttl = ttl;
            }
            state.queue.reschedule(handle, now + ttl);
            return;
        }

        if state.index.len() >= self.capacity {
            if let Some((handle, _)) = state.queue.peek() {
                if let Some(evicted) = state.queue.remove(handle) {
                    state.index.remove(&evicted.key);
                    state.stats.record_eviction();
                    trace!(key = %evicted.key, "evicted record nearest to expiry");
                }
            }
        }

        let handle = state.queue.push(
            Entry {
                key: key.clone(),
                value,
                ttl,
            },
            now + ttl,
        );
        state.index.insert(key, handle);
        debug_assert_eq!(state.index.len(), state.queue.len());
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        let mut state = self.state.lock();
        state.sweep(self.clock.now());

        if let Some(handle) = state.index.remove(key) {
            state.queue.remove(handle);
        }
    }

    // == Clear ==
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.queue.clear();
    }

    // == Length ==
    /// Number of live records. Sweeps expired records first.
    pub fn len(&self) -> usize {
        let mut state = self.state.lock();
        state.sweep(self.clock.now());
        state.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Expire ==
    /// Purges every expired record and returns how many were removed.
    pub fn expire(&self) -> usize {
        self.state.lock().sweep(self.clock.now())
    }

    // == Contains ==
    /// Checks for a live record without renewing it or sweeping.
    pub fn contains(&self, key: &str) -> bool {
        let state = self.state.lock();
        state.live(key, self.clock.now()).is_some()
    }

    // == TTL Remaining ==
    /// Time left before `key` expires, without renewing it.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let state = self.state.lock();
        let now = self.clock.now();
        let handle = state.live(key, now)?;
        let expire_at = state.queue.expire_at(handle)?;
        Some(expire_at.saturating_duration_since(now))
    }

    // == Stats ==
    /// Counter snapshot. Does not sweep, so `total_entries` may include
    /// records that expired since the last operation.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.index.len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const KEY: &str = "key";
    const VALUE: &str = "value";

    fn manual(capacity: usize) -> (ExpiringCache<&'static str>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ExpiringCache::with_clock(capacity, clock.clone()).unwrap();
        (cache, clock)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_expiring_new_rejects_zero_capacity() {
        assert_eq!(
            ExpiringCache::<u32>::new(0).unwrap_err(),
            CacheError::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_expiring_put_and_get() {
        let (cache, _) = manual(1);
        cache.put(KEY.to_string(), VALUE, Duration::from_secs(1));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(KEY), Some(VALUE));
        assert_eq!(cache.get("non-existing-key"), None);
    }

    #[test]
    fn test_expiring_records_expire() {
        let (cache, clock) = manual(2);
        cache.put("key1".to_string(), "value1", ms(1));
        cache.put("key2".to_string(), "value2", ms(1));
        assert_eq!(cache.len(), 2);

        clock.advance(ms(10));

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 2);
    }

    #[test]
    fn test_expiring_deadline_is_inclusive() {
        let (cache, clock) = manual(1);
        cache.put(KEY.to_string(), VALUE, ms(100));

        clock.advance(ms(99));
        assert!(cache.contains(KEY));

        clock.advance(ms(1));
        assert!(!cache.contains(KEY));
        assert_eq!(cache.get(KEY), None);
    }

    #[test]
    fn test_expiring_get_renews_ttl() {
        let (cache, clock) = manual(1);
        cache.put(KEY.to_string(), VALUE, ms(100));

        clock.advance(ms(70));
        assert_eq!(cache.get(KEY), Some(VALUE));

        clock.advance(ms(70));
        assert_eq!(cache.get(KEY), Some(VALUE));
        assert_eq!(cache.ttl_remaining(KEY), Some(ms(100)));

        clock.advance(ms(100));
        assert_eq!(cache.get(KEY), None);
    }

    #[test]
    fn test_expiring_contains_and_ttl_remaining_do_not_renew() {
        let (cache, clock) = manual(1);
        cache.put(KEY.to_string(), VALUE, ms(100));

        clock.advance(ms(60));
        assert!(cache.contains(KEY));
        assert_eq!(cache.ttl_remaining(KEY), Some(ms(40)));

        clock.advance(ms(40));
        assert_eq!(cache.ttl_remaining(KEY), None);
        assert!(!cache.contains(KEY));
    }

    #[test]
    fn test_expiring_put_over_capacity_evicts_nearest_expiry() {
        let (cache, _) = manual(2);

        cache.put("key1".to_string(), "value1", Duration::from_secs(3));
        assert_eq!(cache.get("key1"), Some("value1"));

        cache.put("key2".to_string(), "value2", Duration::from_secs(2));
        assert_eq!(cache.get("key2"), Some("value2"));

        cache.put("key3".to_string(), "value3", Duration::from_secs(1));
        assert_eq!(cache.get("key3"), Some("value3"));

        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.get("key1"), Some("value1"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_expiring_sweep_frees_room_before_eviction() {
        let (cache, clock) = manual(2);
        cache.put("short".to_string(), "v", ms(10));
        cache.put("long".to_string(), "v", ms(1000));

        clock.advance(ms(20));
        cache.put("new".to_string(), "v", ms(1000));

        assert!(cache.contains("long"));
        assert!(cache.contains("new"));
        let stats = cache.stats();
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_expiring_replace_updates_value_and_ttl() {
        let (cache, clock) = manual(10);
        cache.put(KEY.to_string(), "value1", ms(50));
        assert_eq!(cache.get(KEY), Some("value1"));

        cache.put(KEY.to_string(), "value2", ms(500));
        assert_eq!(cache.len(), 1);

        clock.advance(ms(100));
        assert_eq!(cache.get(KEY), Some("value2"));
    }

    #[test]
    fn test_expiring_capacity_one_rewrite_keeps_key() {
        let (cache, _) = manual(1);
        cache.put(KEY.to_string(), "value1", ms(100));
        cache.put(KEY.to_string(), "value2", ms(100));

        assert_eq!(cache.get(KEY), Some("value2"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_expiring_zero_ttl_is_already_expired() {
        let (cache, _) = manual(1);
        cache.put(KEY.to_string(), VALUE, Duration::ZERO);

        assert_eq!(cache.get(KEY), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_expiring_huge_ttl_is_clamped() {
        let (cache, _) = manual(1);
        cache.put(KEY.to_string(), VALUE, Duration::MAX);

        assert_eq!(cache.ttl_remaining(KEY), Some(MAX_TTL));
        assert_eq!(cache.get(KEY), Some(VALUE));
    }

    #[test]
    fn test_expiring_delete_is_idempotent() {
        let (cache, _) = manual(1);
        cache.put(KEY.to_string(), VALUE, Duration::from_secs(1));

        cache.delete(KEY);
        cache.delete(KEY);
        cache.delete("non-existing-key");

        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_expiring_clear() {
        let (cache, _) = manual(10);
        cache.put("key1".to_string(), "value1", Duration::from_secs(1));
        cache.put("key2".to_string(), "value2", Duration::from_secs(1));

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_expiring_expire_returns_removed_count() {
        let (cache, clock) = manual(3);
        cache.put("a".to_string(), "v", ms(10));
        cache.put("b".to_string(), "v", ms(20));
        cache.put("c".to_string(), "v", ms(30));

        clock.advance(ms(25));
        assert_eq!(cache.expire(), 2);
        assert_eq!(cache.expire(), 0);
        assert!(cache.contains("c"));
    }
}

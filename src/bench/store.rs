//! Store Adapters
//!
//! A common get/put surface over the caches and over an unbounded baseline
//! map, so the workload driver can compare them side by side.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{ExpiringCache, LfuCache, LruCache};
use crate::error::Result;

/// Minimal key/value surface driven by the load harness.
pub trait Store<V>: Send + Sync {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Option<V>;
    fn put(&self, key: String, value: V);
    fn len(&self) -> usize;
}

// == Sync Map ==
/// Mutex-guarded `HashMap` with no eviction: the performance baseline.
#[derive(Debug, Default)]
pub struct SyncMap<V> {
    map: Mutex<HashMap<String, V>>,
}

impl<V> SyncMap<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl<V: Clone + Send> Store<V> for SyncMap<V> {
    fn name(&self) -> &'static str {
        "map"
    }

    fn get(&self, key: &str) -> Option<V> {
        self.map.lock().get(key).cloned()
    }

    fn put(&self, key: String, value: V) {
        self.map.lock().insert(key, value);
    }

    fn len(&self) -> usize {
        self.map.lock().len()
    }
}

impl<V: Clone + Send> Store<V> for LruCache<V> {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn get(&self, key: &str) -> Option<V> {
        LruCache::get(self, key)
    }

    fn put(&self, key: String, value: V) {
        LruCache::put(self, key, value)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }
}

impl<V: Clone + Send> Store<V> for LfuCache<V> {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn get(&self, key: &str) -> Option<V> {
        LfuCache::get(self, key)
    }

    fn put(&self, key: String, value: V) {
        LfuCache::put(self, key, value)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }
}

// == Expiring Store ==
/// Expiring cache writing every record with the same TTL.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    cache: ExpiringCache<V>,
    ttl: Duration,
}

impl<V: Clone> ExpiringStore<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Ok(Self {
            cache: ExpiringCache::new(capacity)?,
            ttl,
        })
    }

    pub fn cache(&self) -> &ExpiringCache<V> {
        &self.cache
    }
}

impl<V: Clone + Send> Store<V> for ExpiringStore<V> {
    fn name(&self) -> &'static str {
        "expiring"
    }

    fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key)
    }

    fn put(&self, key: String, value: V) {
        self.cache.put(key, value, self.ttl)
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn exercise(store: &dyn Store<u32>) {
        store.put("a".to_string(), 1);
        store.put("b".to_string(), 2);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_sync_map_never_evicts() {
        let map = SyncMap::<u32>::new(1);
        exercise(&map);
        assert_eq!(Store::len(&map), 2);
        assert_eq!(map.name(), "map");
    }

    #[test]
    fn test_caches_behind_store() {
        let lru = LruCache::<u32>::new(2).unwrap();
        exercise(&lru);
        assert_eq!(Store::len(&lru), 2);

        let lfu = LfuCache::<u32>::new(2).unwrap();
        exercise(&lfu);
        assert_eq!(Store::len(&lfu), 2);

        let expiring = ExpiringStore::<u32>::new(2, Duration::from_secs(60)).unwrap();
        exercise(&expiring);
        assert_eq!(Store::len(&expiring), 2);
        assert!(expiring.cache().ttl_remaining("a").is_some());
    }

    #[test]
    fn test_full_lru_store_evicts_oldest() {
        let lru = LruCache::<u32>::new(1).unwrap();
        let store: &dyn Store<u32> = &lru;
        store.put("a".to_string(), 1);
        store.put("b".to_string(), 2);

        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(2));
        assert_eq!(store.len(), 1);
        assert_eq!(lru.stats().evictions, 1);
    }

    #[test]
    fn test_expiring_store_rejects_zero_capacity() {
        let err = ExpiringStore::<u32>::new(0, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err, CacheError::InvalidCapacity(0));
    }
}

//! LRU Cache Module
//!
//! Least Recently Used eviction over a recency list threaded through an arena.
//!
//! Keys are stored in the list where:
//! - Front = Most recently used
//! - Back = Least recently used

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::arena::{Arena, Handle};
use crate::cache::list::{Linked, Links, List};
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    links: Links,
}

impl<V> Linked for Node<V> {
    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }
}

#[derive(Debug)]
struct LruState<V> {
    /// Key to list node
    index: HashMap<String, Handle>,
    nodes: Arena<Node<V>>,
    order: List,
    stats: CacheStats,
}

impl<V> LruState<V> {
    fn touch(&mut self, handle: Handle) {
        self.order.unlink(&mut self.nodes, handle);
        self.order.push_front(&mut self.nodes, handle);
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let handle = self.order.back()?;
        self.order.unlink(&mut self.nodes, handle);
        let node = self.nodes.remove(handle)?;
        self.index.remove(&node.key);
        self.stats.record_eviction();
        Some(node.key)
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(handle) = self.index.remove(key) else {
            return false;
        };
        self.order.unlink(&mut self.nodes, handle);
        self.nodes.remove(handle);
        true
    }
}

// == LRU Cache ==
/// Thread-safe, capacity-bounded cache evicting the least recently used key.
///
/// Both `get` and `put` count as a use.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    state: Mutex<LruState<V>>,
}

impl<V: Clone> LruCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` records.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(capacity, "lru cache created");

        Ok(Self {
            capacity,
            state: Mutex::new(LruState {
                index: HashMap::with_capacity(capacity),
                nodes: Arena::with_capacity(capacity),
                order: List::new(),
                stats: CacheStats::new(),
            }),
        })
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let found = state.index.get(key).copied().and_then(|handle| {
            state.touch(handle);
            state.nodes.get(handle).map(|node| node.value.clone())
        });
        state.stats.record_lookup(&found);
        found
    }

    // == Put ==
    /// Inserts or replaces `key`, making it most recently used.
    ///
    /// A new key arriving at a full cache evicts the least recently used
    /// record first. Replacing an existing key never evicts.
    pub fn put(&self, key: String, value: V) {
        let mut state = self.state.lock();
        let state = &mut *state;

        if let Some(handle) = state.index.get(&key).copied() {
            if let Some(node) = state.nodes.get_mut(handle) {
                node.value = value;
            }
            state.touch(handle);
            return;
        }

        if state.index.len() >= self.capacity {
            if let Some(evicted) = state.evict_oldest() {
                trace!(key = %evicted, "evicted least recently used record");
            }
        }

        let handle = state.nodes.insert(Node {
            key: key.clone(),
            value,
            links: Links::default(),
        });
        state.order.push_front(&mut state.nodes, handle);
        state.index.insert(key, handle);
        debug_assert_eq!(state.index.len(), state.order.len());
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        self.state.lock().remove(key);
    }

    // == Clear ==
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.nodes.clear();
        state.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Contains ==
    /// Checks presence without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().index.contains_key(key)
    }

    // == Least Recently Used ==
    /// Returns the next eviction candidate without touching it.
    pub fn least_recently_used(&self) -> Option<String> {
        let state = self.state.lock();
        let handle = state.order.back()?;
        state.nodes.get(handle).map(|node| node.key.clone())
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.index.len())
    }
}

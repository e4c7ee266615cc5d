//! LFU Cache Module
//!
//! O(1) Least Frequently Used eviction.
//!
//! Records sharing an access count live in one frequency bucket; buckets form
//! a list in strictly ascending frequency order:
//!
//! ```text
//! buckets:  [freq 1] <-> [freq 2] <-> [freq 5]
//!              |            |            |
//! records:  d <-> c         a         b <-> e
//!         (front = most recently touched, back = next eviction candidate)
//! ```
//!
//! A bucket is dropped the moment its last record leaves, and a promoted
//! record only ever moves to the adjacent bucket, so no operation searches.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::arena::{Arena, Handle};
use crate::cache::list::{Linked, Links, List};
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    /// Owning frequency bucket
    bucket: Handle,
    links: Links,
}

impl<V> Linked for Entry<V> {
    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }
}

#[derive(Debug)]
struct Bucket {
    frequency: u64,
    entries: List,
    links: Links,
}

impl Bucket {
    fn new(frequency: u64) -> Self {
        Self {
            frequency,
            entries: List::new(),
            links: Links::default(),
        }
    }
}

impl Linked for Bucket {
    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }
}

#[derive(Debug)]
struct LfuState<V> {
    index: HashMap<String, Handle>,
    entries: Arena<Entry<V>>,
    buckets: Arena<Bucket>,
    /// Buckets in ascending frequency order
    frequencies: List,
    stats: CacheStats,
}

impl<V> LfuState<V> {
    fn frequency_of(&self, bucket: Handle) -> Option<u64> {
        self.buckets.get(bucket).map(|bucket| bucket.frequency)
    }

    // == Attach / Detach ==
    fn attach(&mut self, handle: Handle, bucket: Handle) {
        if let Some(target) = self.buckets.get_mut(bucket) {
            target.entries.push_front(&mut self.entries, handle);
        }
        if let Some(entry) = self.entries.get_mut(handle) {
            entry.bucket = bucket;
        }
    }

    /// Unlinks an entry from its bucket, dropping the bucket if it empties.
    fn detach(&mut self, handle: Handle) {
        let Some(bucket) = self.entries.get(handle).map(|entry| entry.bucket) else {
            return;
        };
        let emptied = match self.buckets.get_mut(bucket) {
            Some(current) => {
                current.entries.unlink(&mut self.entries, handle);
                current.entries.is_empty()
            }
            None => false,
        };

        if emptied {
            self.frequencies.unlink(&mut self.buckets, bucket);
            self.buckets.remove(bucket);
        }
    }

    // == Promote ==
    /// Moves an entry into the bucket for its frequency + 1, creating that
    /// bucket right after the current one when it does not exist yet.
    fn promote(&mut self, handle: Handle) {
        let Some(current) = self.entries.get(handle).map(|entry| entry.bucket) else {
            return;
        };
        let Some(frequency) = self.frequency_of(current) else {
            return;
        };
        let promoted = frequency + 1;

        let target = match self.frequencies.next(&self.buckets, current) {
            Some(next) if self.frequency_of(next) == Some(promoted) => next,
            _ => {
                let bucket = self.buckets.insert(Bucket::new(promoted));
                self.frequencies
                    .insert_after(&mut self.buckets, current, bucket);
                bucket
            }
        };

        // The target is linked before the old bucket can be dropped
        self.detach(handle);
        self.attach(handle, target);
    }

    // == Insert ==
    /// Adds a new entry at frequency 1.
    fn insert(&mut self, key: String, value: V) {
        let first = match self.frequencies.front() {
            Some(front) if self.frequency_of(front) == Some(1) => front,
            _ => {
                let bucket = self.buckets.insert(Bucket::new(1));
                self.frequencies.push_front(&mut self.buckets, bucket);
                bucket
            }
        };

        let handle = self.entries.insert(Entry {
            key: key.clone(),
            value,
            bucket: first,
            links: Links::default(),
        });
        self.attach(handle, first);
        self.index.insert(key, handle);
    }

    // == Eviction Candidate ==
    /// Least recently touched entry of the lowest frequency bucket.
    fn candidate(&self) -> Option<(Handle, u64)> {
        let lowest = self.frequencies.front()?;
        let bucket = self.buckets.get(lowest)?;
        Some((bucket.entries.back()?, bucket.frequency))
    }

    fn remove_entry(&mut self, handle: Handle) -> Option<Entry<V>> {
        self.detach(handle);
        let entry = self.entries.remove(handle)?;
        self.index.remove(&entry.key);
        Some(entry)
    }
}

// == LFU Cache ==
/// Thread-safe, capacity-bounded cache evicting the least frequently used key.
///
/// Every `get` and every `put` of an existing key adds one to the key's
/// frequency. Ties inside the lowest frequency are broken by recency: the
/// record touched longest ago goes first.
#[derive(Debug)]
pub struct LfuCache<V> {
    capacity: usize,
    state: Mutex<LfuState<V>>,
}

impl<V: Clone> LfuCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` records.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(capacity, "lfu cache created");

        Ok(Self {
            capacity,
            state: Mutex::new(LfuState {
                index: HashMap::with_capacity(capacity),
                entries: Arena::with_capacity(capacity),
                buckets: Arena::with_capacity(capacity),
                frequencies: List::new(),
                stats: CacheStats::new(),
            }),
        })
    }

    // == Get ==
    /// Returns the value for `key` and bumps its frequency.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let found = state.index.get(key).copied().and_then(|handle| {
            state.promote(handle);
            state.entries.get(handle).map(|entry| entry.value.clone())
        });
        state.stats.record_lookup(&found);
        found
    }

    // == Put ==
    /// Inserts `key` at frequency 1, or replaces its value and bumps its
    /// frequency if it already exists.
    ///
    /// A new key arriving at a full cache evicts the eviction candidate first.
    pub fn put(&self, key: String, value: V) {
        let mut state = self.state.lock();
        let state = &mut *state;

        if let Some(handle) = state.index.get(&key).copied() {
            if let Some(entry) = state.entries.get_mut(handle) {
                entry.value = value;
            }
            state.promote(handle);
            return;
        }

        if state.index.len() >= self.capacity {
            if let Some((handle, frequency)) = state.candidate() {
                if let Some(evicted) = state.remove_entry(handle) {
                    state.stats.record_eviction();
                    trace!(key = %evicted.key, frequency, "evicted least frequently used record");
                }
            }
        }

        state.insert(key, value);
        debug_assert_eq!(state.index.len(), state.entries.len());
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(handle) = state.index.get(key).copied() {
            state.remove_entry(handle);
        }
    }

    // == Clear ==
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.entries.clear();
        state.buckets.clear();
        state.frequencies.clear();
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
    /// Checks presence without changing frequency.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().index.contains_key(key)
    }

    // == Frequency ==
    /// Current access count of `key`, without counting this call.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        let state = self.state.lock();
        let handle = state.index.get(key)?;
        let bucket = state.entries.get(*handle)?.bucket;
        state.frequency_of(bucket)
    }

    // == Least Frequently Used ==
    /// Returns the next eviction candidate and its frequency without touching it.
    pub fn least_frequently_used(&self) -> Option<(String, u64)> {
        let state = self.state.lock();
        let (handle, frequency) = state.candidate()?;
        state
            .entries
            .get(handle)
            .map(|entry| (entry.key.clone(), frequency))
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.index.len())
    }
}

use std::time::Duration;

use rand::distributions::Uniform;
use rand::{thread_rng, Rng};

use caches::bench::{ExpiringStore, Store, SyncMap};
use caches::{LfuCache, LruCache};

/// Store sizes every get/put benchmark runs at.
pub const SIZES: [usize; 2] = [10_000, 100_000];

/// Long enough that nothing expires while a benchmark runs.
const TTL: Duration = Duration::from_secs(600);

/// The baseline map followed by the three caches, each bounded at `capacity`.
pub fn stores(capacity: usize) -> Vec<Box<dyn Store<String>>> {
    vec![
        Box::new(SyncMap::<String>::new(capacity)),
        Box::new(LruCache::<String>::new(capacity).unwrap()),
        Box::new(LfuCache::<String>::new(capacity).unwrap()),
        Box::new(ExpiringStore::<String>::new(capacity, TTL).unwrap()),
    ]
}

/// Writes keys `0..size`, each mapped to itself.
pub fn prefill(store: &dyn Store<String>, size: usize) {
    for index in 0..size {
        let key = index.to_string();
        store.put(key.clone(), key);
    }
}

/// `samples` keys drawn uniformly from `0..key_space`.
pub fn distribution(key_space: usize, samples: usize) -> Vec<String> {
    thread_rng()
        .sample_iter(Uniform::new(0, key_space))
        .take(samples)
        .map(|key| key.to_string())
        .collect()
}

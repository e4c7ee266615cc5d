//! Workload Driver
//!
//! Hammers a [`Store`] from several blocking workers and reports hit counts.
//! Throughput lives in the criterion suite under `benches/`.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::bench::Store;
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Report ==
/// Outcome of one workload run against one store.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub store: &'static str,
    pub operations: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Records left in the store after the run
    pub final_len: usize,
}

#[derive(Debug, Default)]
struct Tally {
    hits: u64,
    misses: u64,
}

impl Tally {
    fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

fn key_for(rng: &mut impl Rng, key_space: usize) -> String {
    rng.gen_range(0..key_space).to_string()
}

/// Even operations write a fresh random key, odd operations read one back.
fn drive(store: &dyn Store<String>, operations: usize, key_space: usize) -> Tally {
    let mut rng = rand::thread_rng();
    let mut tally = Tally::default();
    for op in 0..operations {
        let key = key_for(&mut rng, key_space);
        if op % 2 == 0 {
            store.put(key.clone(), key);
        } else if store.get(&key).is_some() {
            tally.hits += 1;
        } else {
            tally.misses += 1;
        }
    }
    tally
}

// == Run Workload ==
/// Runs `config.operations` operations against `store`, split across
/// `config.workers` blocking tasks.
pub async fn run_workload(store: Arc<dyn Store<String>>, config: &Config) -> Result<Report> {
    config.validate()?;

    let name = store.name();
    let mut handles = Vec::with_capacity(config.workers);

    for worker in 0..config.workers {
        let operations = config.operations / config.workers
            + usize::from(worker < config.operations % config.workers);
        let store = Arc::clone(&store);
        let key_space = config.key_space;

        handles.push(tokio::task::spawn_blocking(move || {
            drive(store.as_ref(), operations, key_space)
        }));
    }

    let mut tally = Tally::default();
    for handle in handles {
        let worker = handle
            .await
            .map_err(|e| CacheError::Internal(format!("{} worker failed: {}", name, e)))?;
        tally.hits += worker.hits;
        tally.misses += worker.misses;
    }
    debug!(store = name, workers = config.workers, "workload finished");

    let report = Report {
        store: name,
        operations: config.operations,
        hits: tally.hits,
        misses: tally.misses,
        hit_rate: tally.hit_rate(),
        final_len: store.len(),
    };
    info!(
        "{}: {} ops, {} hits, {} misses ({:.1}% hit rate), {} records",
        report.store,
        report.operations,
        report.hits,
        report.misses,
        report.hit_rate * 100.0,
        report.final_len
    );
    Ok(report)
}

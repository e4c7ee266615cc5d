//! Caches load harness
//!
//! Runs the same mixed put/get workload against the baseline map and each
//! cache, then prints the hit-rate reports as JSON. Throughput is measured
//! by the criterion suite (`cargo bench`).

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caches::bench::{run_workload, ExpiringStore, Store, SyncMap};
use caches::{Config, LfuCache, LruCache};

/// Main entry point for the load harness.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the baseline map and the three caches
/// 4. Run the workload against each store in turn
/// 5. Print all reports as pretty JSON on stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caches=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate().context("invalid harness configuration")?;
    info!(
        "Configuration loaded: capacity={}, operations={}, workers={}, key_space={}, ttl={}ms",
        config.capacity, config.operations, config.workers, config.key_space, config.ttl_ms
    );

    let stores: Vec<Arc<dyn Store<String>>> = vec![
        Arc::new(SyncMap::<String>::new(config.capacity)),
        Arc::new(LruCache::<String>::new(config.capacity)?),
        Arc::new(LfuCache::<String>::new(config.capacity)?),
        Arc::new(ExpiringStore::<String>::new(config.capacity, config.ttl())?),
    ];

    let mut reports = Vec::with_capacity(stores.len());
    for store in stores {
        let report = run_workload(store, &config)
            .await
            .context("workload failed")?;
        reports.push(report);
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    info!("Load harness finished");
    Ok(())
}

//! Load Harness Module
//!
//! Drives the caches and an unbounded baseline map under concurrent load.

mod store;
mod workload;

pub use store::{ExpiringStore, Store, SyncMap};
pub use workload::{run_workload, Report};

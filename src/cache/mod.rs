//! Cache Module
//!
//! Capacity-bounded in-memory caches, one per eviction policy:
//! - [`LruCache`]: least recently used
//! - [`LfuCache`]: least frequently used, O(1)
//! - [`ExpiringCache`]: passive per-record TTL
//!
//! Each engine keeps a key index and an ordering structure in sync behind a
//! single mutex. Lookups mutate ordering state, so there is no read lock.

mod arena;
mod clock;
mod expiring;
mod expiry_queue;
mod lfu;
mod list;
mod lru;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiring::ExpiringCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use stats::CacheStats;

use std::time::Duration;

// == Public Constants ==
/// Longest TTL the expiring cache stores; longer TTLs are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 10); // 10 years

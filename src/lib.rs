//! Caches - bounded, thread-safe in-memory key/value caches
//!
//! Provides three eviction policies behind the same get/put/delete/clear/len
//! contract: least recently used, O(1) least frequently used, and passive
//! time-to-live expiration.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, ExpiringCache, LfuCache, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};

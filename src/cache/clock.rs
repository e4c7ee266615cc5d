//! Clock Module
//!
//! Time source for the expiring cache. Expiry is computed against a monotonic
//! clock so wall-clock adjustments never expire or resurrect records.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Supplies the current instant to time-aware caches.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;

    /// An instant counts as passed once `now` reaches it.
    fn has_passed(&self, instant: Instant) -> bool {
        self.now() >= instant
    }
}

// == System Clock ==
/// Reads [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Useful for driving TTL behaviour deterministically in tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}

//! Error types for the caches
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caches and the load harness.
///
/// Lookup misses and deletes of absent keys are not errors; they are reported
/// through `Option` or treated as no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must hold at least one record
    #[error("Invalid capacity: {0}, capacity must be greater than zero")]
    InvalidCapacity(usize),

    /// Harness configuration rejected by validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Harness worker failure
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caches.
pub type Result<T> = std::result::Result<T, CacheError>;

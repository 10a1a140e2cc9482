//! Error types for the priority cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the priority cache.
///
/// Capacity infeasibility is not an error: `set` reports it through its
/// boolean return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == Result Type Alias ==
/// Convenience Result type for the priority cache.
pub type Result<T> = std::result::Result<T, CacheError>;

//! Priority Cache - A size-bounded in-memory cache
//!
//! Evicts entries by access count, then size, protects permanent keys and
//! lets callers observe or rewrite values through get/set/remove hooks.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheBuilder, CacheEntry, CacheStats, EntryUnit, PriorityCache, Staged};
pub use config::CacheConfig;
pub use error::{CacheError, Result};

//! Cache Module
//!
//! Provides a size-bounded cache with priority eviction and observer hooks.

mod entry;
mod hooks;
mod policy;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EntryUnit, Staged};
pub use hooks::{CacheBuilder, OnGet, OnRemove, OnSet};
pub use policy::{PermanentKeys, Priority};
pub use stats::CacheStats;
pub use store::PriorityCache;

//! Cache Statistics Module
//!
//! Tracks cache metrics including hits, misses, evictions and rejected sets.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads of absent keys
    pub misses: u64,
    /// Number of entries evicted to make room for a set
    pub evictions: u64,
    /// Number of sets that could not be accommodated
    pub rejections: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current sum of entry sizes
    pub total_size: usize,
    /// Maximum total size
    pub capacity: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    // == Update Occupancy ==
    /// Updates the entry count and total size.
    pub fn set_occupancy(&mut self, entries: usize, size: usize) {
        self.total_entries = entries;
        self.total_size = size;
    }
}

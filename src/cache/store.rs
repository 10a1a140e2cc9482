//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with priority eviction,
//! permanent keys and observer hooks.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::cache::hooks::CacheHooks;
use crate::cache::policy::{Candidate, EvictionPlanner};
use crate::cache::{CacheBuilder, CacheEntry, CacheStats, EntryUnit, PermanentKeys, Priority};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Priority Cache ==
/// Size-bounded cache that evicts by access count, then size.
///
/// The sum of entry sizes never exceeds the capacity. A `set` that cannot
/// be accommodated returns `false` and leaves the cache untouched.
#[derive(Debug)]
pub struct PriorityCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Keys exempt from eviction
    permanent: PermanentKeys,
    /// Optional observer callbacks
    hooks: CacheHooks<T>,
    /// Statistics
    stats: CacheStats,
    /// Maximum total size
    capacity: usize,
    /// Sum of entry sizes
    total_size: usize,
    /// Next insertion sequence number
    next_seq: u64,
}

impl<T> PriorityCache<T> {
    // == Constructors ==
    /// Creates a cache with no permanent keys and no hooks.
    pub fn new(capacity: usize) -> Self {
        Self::from_parts(capacity, PermanentKeys::new(), CacheHooks::default())
    }

    /// Returns a builder for configuring permanent keys and hooks.
    pub fn builder(capacity: usize) -> CacheBuilder<T> {
        CacheBuilder::new(capacity)
    }

    /// Creates a hook-less cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::builder(config.capacity)
            .permanent_keys(config.permanent_keys.iter().cloned())
            .build()
    }

    pub(crate) fn from_parts(
        capacity: usize,
        permanent: PermanentKeys,
        hooks: CacheHooks<T>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            permanent,
            hooks,
            stats: CacheStats::new(capacity),
            capacity,
            total_size: 0,
            next_seq: 0,
        }
    }

    // == Has ==
    /// Returns true if an entry exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Peek ==
    /// Returns the stored value without counting an access or calling hooks.
    pub fn peek(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(CacheEntry::value)
    }

    /// Returns how many times `key` has been read.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(CacheEntry::count)
    }

    /// Returns true if `key` is exempt from eviction.
    pub fn is_permanent(&self, key: &str) -> bool {
        self.permanent.contains(key)
    }

    // == Set ==
    /// Stores `value` under `key` with the declared `size`.
    ///
    /// Evicts lower-priority, non-permanent entries if needed. Returns
    /// `false` without changing anything if the value cannot fit.
    pub fn set(&mut self, key: impl Into<String>, value: T, size: usize) -> bool {
        self.insert(key.into(), value, size, false)
    }

    /// Like [`set`](Self::set), but may evict any non-permanent entry
    /// regardless of its priority.
    pub fn set_forced(&mut self, key: impl Into<String>, value: T, size: usize) -> bool {
        self.insert(key.into(), value, size, true)
    }

    fn insert(&mut self, key: String, value: T, size: usize, force: bool) -> bool {
        let (current, count) = self
            .entries
            .get(&key)
            .map_or((0, 0), |entry| (entry.size(), entry.count()));

        let (value, size) = match self.hooks.on_set.as_mut() {
            Some(hook) => {
                let staged = hook(key.as_str(), EntryUnit { value, size, count });
                trace!(key = %key, size = staged.size, "on_set hook applied");
                (staged.value, staged.size)
            }
            None => (value, size),
        };

        if size > self.capacity {
            debug!(key = %key, size, capacity = self.capacity, "Rejected set larger than capacity");
            self.stats.record_rejection();
            return false;
        }

        let planner = EvictionPlanner {
            capacity: self.capacity,
            total: self.total_size,
            current,
            incoming: Priority::new(count, size),
            force,
        };

        let Some(evictions) = planner.plan(self.candidates(&key)) else {
            debug!(key = %key, size, total = self.total_size, "Rejected set, no room after eviction scan");
            self.stats.record_rejection();
            return false;
        };

        for evicted in evictions {
            debug!(key = %evicted, incoming = %key, "Evicting entry");
            self.remove(&evicted);
            self.stats.record_eviction();
        }

        if !planner.fits(self.total_size) {
            warn!(key = %key, total = self.total_size, "Entry still does not fit after eviction");
            self.stats.record_rejection();
            return false;
        }

        self.total_size = self.total_size - current + size;
        match self.entries.get_mut(&key) {
            Some(entry) => entry.replace(value, size),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(key, CacheEntry::new(value, size, seq));
            }
        }
        self.sync_stats();

        true
    }

    /// Lists every entry the scan may consider for evicting in favour of `key`.
    fn candidates(&self, key: &str) -> Vec<Candidate> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key && !self.permanent.contains(k))
            .map(|(k, entry)| Candidate {
                key: k.clone(),
                priority: entry.priority(),
                seq: entry.seq(),
            })
            .collect()
    }

    // == Remove ==
    /// Removes an entry by key. Absent keys are ignored.
    pub fn remove(&mut self, key: &str) {
        let Some(entry) = self.entries.remove(key) else {
            return;
        };

        self.total_size = self.total_size.saturating_sub(entry.size());
        self.sync_stats();

        if let Some(hook) = self.hooks.on_remove.as_mut() {
            hook(key, entry.into_unit());
        }
    }

    // == Remove All ==
    /// Removes every entry, firing `on_remove` once per entry in insertion order.
    pub fn remove_all(&mut self) {
        for key in self.keys() {
            self.remove(&key);
        }
    }

    // == Accessors ==
    /// Returns the capacity.
    pub fn max(&self) -> usize {
        self.capacity
    }

    /// Returns the current sum of entry sizes.
    pub fn size(&self) -> usize {
        self.total_size
    }

    /// Returns the current keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let mut keyed: Vec<(u64, &String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.seq(), key))
            .collect();
        keyed.sort_unstable_by_key(|(seq, _)| *seq);
        keyed.into_iter().map(|(_, key)| key.clone()).collect()
    }

    /// Read-only view of the raw storage.
    pub fn bucket(&self) -> &HashMap<String, CacheEntry<T>> {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    fn sync_stats(&mut self) {
        self.stats.set_occupancy(self.entries.len(), self.total_size);
    }
}

impl<T: Clone> PriorityCache<T> {
    // == Get ==
    /// Retrieves a value by key and counts the access.
    ///
    /// With an `on_get` hook the hook's return value is handed back instead
    /// of the stored value.
    pub fn get(&mut self, key: &str) -> Result<T> {
        let Some(entry) = self.entries.get_mut(key) else {
            trace!(key, "Cache miss");
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        entry.record_access();
        self.stats.record_hit();
        trace!(key, count = entry.count(), "Cache hit");

        match self.hooks.on_get.as_mut() {
            Some(hook) => Ok(hook(key, entry.to_unit())),
            None => Ok(entry.value().clone()),
        }
    }
}

//! Cache Entry Module
//!
//! Defines stored entries and the detached records handed to hooks.

use crate::cache::Priority;

// == Cache Entry ==
/// A single stored value with its declared size and access count.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    size: usize,
    count: u64,
    /// Insertion sequence, used to break priority ties and order iteration
    seq: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry. Access count starts at zero.
    pub(crate) fn new(value: T, size: usize, seq: u64) -> Self {
        Self {
            value,
            size,
            count: 0,
            seq,
        }
    }

    /// Returns the stored value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the caller-declared size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of successful reads.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the `(count, size)` eviction priority.
    pub fn priority(&self) -> Priority {
        Priority::new(self.count, self.size)
    }

    // == Record Access ==
    pub(crate) fn record_access(&mut self) {
        self.count += 1;
    }

    // == Replace ==
    /// Swaps in a new value and size, keeping the access count.
    pub(crate) fn replace(&mut self, value: T, size: usize) {
        self.value = value;
        self.size = size;
    }

    /// Detaches the entry into a snapshot for removal hooks.
    pub(crate) fn into_unit(self) -> EntryUnit<T> {
        EntryUnit {
            value: self.value,
            size: self.size,
            count: self.count,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Copies the entry into a draft for read hooks.
    pub(crate) fn to_unit(&self) -> EntryUnit<T> {
        EntryUnit {
            value: self.value.clone(),
            size: self.size,
            count: self.count,
        }
    }
}

// == Entry Unit ==
/// Detached `{value, size, count}` record passed to hooks.
///
/// Hooks own this record outright; nothing they do to it reaches the
/// stored entry unless a hook's return value says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUnit<T> {
    pub value: T,
    pub size: usize,
    pub count: u64,
}

impl<T> EntryUnit<T> {
    /// Drops the advisory count, keeping what `set` will store.
    pub fn into_staged(self) -> Staged<T> {
        Staged {
            value: self.value,
            size: self.size,
        }
    }
}

// == Staged ==
/// The value and size an `on_set` hook hands back for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged<T> {
    pub value: T,
    pub size: usize,
}

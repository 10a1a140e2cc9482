//! Eviction Policy Module
//!
//! Implements the access-count/size priority rule and the two-phase
//! eviction planner used by `set`.

use std::collections::HashSet;

// == Priority ==
/// Eviction priority of an entry, ordered by access count then size.
///
/// Lower priorities are evicted first. In non-forced mode a candidate may
/// only be evicted for an incoming entry of strictly higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    /// Number of successful reads
    pub count: u64,
    /// Caller-declared size
    pub size: usize,
}

impl Priority {
    pub fn new(count: u64, size: usize) -> Self {
        Self { count, size }
    }

    /// Returns true if an entry of this priority may be evicted to make
    /// room for `incoming` without forcing.
    pub fn yields_to(&self, incoming: &Priority) -> bool {
        self < incoming
    }
}

// == Permanent Keys ==
/// Keys exempt from the eviction scan.
#[derive(Debug, Clone, Default)]
pub struct PermanentKeys {
    keys: HashSet<String>,
}

impl PermanentKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `key` is pinned.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermanentKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// == Candidate ==
/// An existing entry that may be evicted.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub key: String,
    pub priority: Priority,
    /// Insertion sequence, keeps ties in insertion order
    pub seq: u64,
}

// == Eviction Planner ==
/// Decides which entries a `set` must evict, without touching storage.
///
/// The planner first simulates evictions in priority order until the
/// incoming entry would fit, then walks the simulated queue backwards and
/// spares every candidate the leftover slack can still cover.
#[derive(Debug, Clone)]
pub(crate) struct EvictionPlanner {
    /// Cache capacity
    pub capacity: usize,
    /// Current total size of the cache
    pub total: usize,
    /// Size currently stored under the incoming key (0 if absent)
    pub current: usize,
    /// Access count and effective size of the incoming entry
    pub incoming: Priority,
    /// Ignore the priority rule
    pub force: bool,
}

impl EvictionPlanner {
    // == Projection ==
    /// Total size after the incoming entry is applied on top of `total`.
    fn projected(&self, total: usize) -> Option<usize> {
        total
            .saturating_sub(self.current)
            .checked_add(self.incoming.size)
    }

    // == Fits ==
    /// Checks whether the incoming entry fits on top of `total`.
    pub fn fits(&self, total: usize) -> bool {
        self.projected(total)
            .is_some_and(|projected| projected <= self.capacity)
    }

    // == Plan ==
    /// Returns the keys to evict, in eviction order, or `None` if no
    /// permissible set of evictions makes room.
    ///
    /// `candidates` must already exclude the incoming key and permanent keys.
    pub fn plan(&self, mut candidates: Vec<Candidate>) -> Option<Vec<String>> {
        if self.fits(self.total) {
            return Some(Vec::new());
        }

        candidates.sort_by_key(|c| (c.priority, c.seq));

        let mut remaining = self.total;
        let mut queue = Vec::new();
        let mut feasible = false;

        for candidate in candidates {
            if !self.force && !candidate.priority.yields_to(&self.incoming) {
                continue;
            }
            remaining = remaining.saturating_sub(candidate.priority.size);
            queue.push(candidate);
            if self.fits(remaining) {
                feasible = true;
                break;
            }
        }

        if !feasible {
            return None;
        }

        let mut slack = self
            .projected(remaining)
            .map_or(0, |projected| self.capacity - projected);

        let mut evict = Vec::with_capacity(queue.len());
        for candidate in queue.into_iter().rev() {
            let size = candidate.priority.size;
            if slack > 0 && slack >= size {
                slack -= size;
            } else {
                evict.push(candidate.key);
            }
        }

        Some(evict)
    }
}

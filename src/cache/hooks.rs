//! Hooks Module
//!
//! Observer callbacks and the builder that wires them into a cache.

use std::fmt;

use crate::cache::{EntryUnit, PermanentKeys, PriorityCache, Staged};

/// Called on every successful `get` with a copy of the entry. The returned
/// value is what `get` hands back; the stored entry is left untouched.
pub type OnGet<T> = Box<dyn FnMut(&str, EntryUnit<T>) -> T + Send>;

/// Called on every `set` attempt before the capacity check. The returned
/// value and size are what gets measured and stored. `count` is advisory.
pub type OnSet<T> = Box<dyn FnMut(&str, EntryUnit<T>) -> Staged<T> + Send>;

/// Called after an entry has left storage, explicitly or by eviction.
pub type OnRemove<T> = Box<dyn FnMut(&str, EntryUnit<T>) + Send>;

// == Hooks ==
/// Optional callbacks captured for the lifetime of a cache.
pub(crate) struct CacheHooks<T> {
    pub on_get: Option<OnGet<T>>,
    pub on_set: Option<OnSet<T>>,
    pub on_remove: Option<OnRemove<T>>,
}

impl<T> Default for CacheHooks<T> {
    fn default() -> Self {
        Self {
            on_get: None,
            on_set: None,
            on_remove: None,
        }
    }
}

impl<T> fmt::Debug for CacheHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHooks")
            .field("on_get", &self.on_get.is_some())
            .field("on_set", &self.on_set.is_some())
            .field("on_remove", &self.on_remove.is_some())
            .finish()
    }
}

// == Cache Builder ==
/// Configures and creates a [`PriorityCache`].
///
/// ```
/// use priority_cache::PriorityCache;
///
/// let mut cache = PriorityCache::<String>::builder(10)
///     .permanent_keys(["config"])
///     .on_set(|_key, mut draft| {
///         draft.value = draft.value.to_uppercase();
///         draft.into_staged()
///     })
///     .build();
///
/// assert!(cache.set("config", "on".to_string(), 2));
/// assert_eq!(cache.get("config").unwrap(), "ON");
/// ```
pub struct CacheBuilder<T> {
    capacity: usize,
    permanent: PermanentKeys,
    hooks: CacheHooks<T>,
}

impl<T> CacheBuilder<T> {
    /// Starts a builder for a cache of the given total size.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            permanent: PermanentKeys::new(),
            hooks: CacheHooks::default(),
        }
    }

    /// Exempts these keys from eviction, forced or not.
    pub fn permanent_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permanent = keys.into_iter().collect();
        self
    }

    pub fn on_get<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str, EntryUnit<T>) -> T + Send + 'static,
    {
        self.hooks.on_get = Some(Box::new(hook));
        self
    }

    pub fn on_set<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str, EntryUnit<T>) -> Staged<T> + Send + 'static,
    {
        self.hooks.on_set = Some(Box::new(hook));
        self
    }

    pub fn on_remove<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str, EntryUnit<T>) + Send + 'static,
    {
        self.hooks.on_remove = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> PriorityCache<T> {
        PriorityCache::from_parts(self.capacity, self.permanent, self.hooks)
    }
}

impl<T> fmt::Debug for CacheBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("capacity", &self.capacity)
            .field("permanent", &self.permanent)
            .field("hooks", &self.hooks)
            .finish()
    }
}

//! Configuration Module
//!
//! Handles loading cache configuration from environment variables or any
//! serde-compatible source.

use std::env;

use serde::Deserialize;

/// Default capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum total size of all stored entries
    pub capacity: usize,
    /// Keys exempt from priority eviction
    pub permanent_keys: Vec<String>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Total size budget, negative values clamp to 0 (default: 1024)
    /// - `CACHE_PERMANENT_KEYS` - Comma-separated permanent keys (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            capacity: lookup("CACHE_CAPACITY")
                .and_then(|v| parse_capacity(&v))
                .unwrap_or(DEFAULT_CAPACITY),
            permanent_keys: lookup("CACHE_PERMANENT_KEYS")
                .map(|v| parse_key_list(&v))
                .unwrap_or_default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            permanent_keys: Vec::new(),
        }
    }
}

/// Parses a signed capacity, clamping negatives to zero.
fn parse_capacity(raw: &str) -> Option<usize> {
    let parsed: i64 = raw.trim().parse().ok()?;
    Some(usize::try_from(parsed.max(0)).unwrap_or(usize::MAX))
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

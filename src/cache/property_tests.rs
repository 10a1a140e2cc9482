//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the size, rollback and eviction invariants of
//! `PriorityCache` over random operation sequences.

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use crate::cache::{Priority, PriorityCache};

// == Test Configuration ==
const MAX_TEST_CAPACITY: usize = 24;

type Snapshot = BTreeMap<String, (String, usize, u64)>;

// == Strategies ==
/// Small key pool so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, size: usize, force: bool },
    Get { key: String },
    Remove { key: String },
    RemoveAll,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        6 => (key_strategy(), 0..=MAX_TEST_CAPACITY + 2, any::<bool>())
            .prop_map(|(key, size, force)| CacheOp::Set { key, size, force }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::RemoveAll),
    ]
}

fn snapshot(cache: &PriorityCache<String>) -> Snapshot {
    cache
        .bucket()
        .iter()
        .map(|(k, e)| (k.clone(), (e.value().clone(), e.size(), e.count())))
        .collect()
}

fn logged_cache(capacity: usize, permanent: &[&str]) -> (PriorityCache<String>, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let cache = PriorityCache::builder(capacity)
        .permanent_keys(permanent.iter().copied())
        .on_remove(move |key, _| sink.lock().unwrap().push(key.to_string()))
        .build();
    (cache, log)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Total size stays within capacity and always equals the sum of entry sizes.
    #[test]
    fn prop_size_accounting(
        capacity in 0..=MAX_TEST_CAPACITY,
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let (mut cache, _) = logged_cache(capacity, &["a"]);

        for (n, op) in ops.into_iter().enumerate() {
            match op {
                CacheOp::Set { key, size, force } => {
                    let value = format!("{}{}", key, n);
                    if force {
                        cache.set_forced(key, value, size);
                    } else {
                        cache.set(key, value, size);
                    }
                }
                CacheOp::Get { key } => { let _ = cache.get(&key); }
                CacheOp::Remove { key } => cache.remove(&key),
                CacheOp::RemoveAll => cache.remove_all(),
            }

            let sum: usize = cache.bucket().values().map(|e| e.size()).sum();
            prop_assert!(cache.size() <= cache.max(), "size {} over capacity {}", cache.size(), cache.max());
            prop_assert_eq!(cache.size(), sum);
            prop_assert_eq!(cache.stats().total_size, sum);
            prop_assert_eq!(cache.stats().total_entries, cache.len());
        }
    }

    // A rejected set leaves every entry exactly as it was, and a successful
    // one stores what it was given.
    #[test]
    fn prop_set_is_all_or_nothing(
        capacity in 0..=MAX_TEST_CAPACITY,
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let (mut cache, log) = logged_cache(capacity, &["b"]);

        for (n, op) in ops.into_iter().enumerate() {
            let (key, size, force) = match op {
                CacheOp::Set { key, size, force } => (key, size, force),
                CacheOp::Get { key } => {
                    let _ = cache.get(&key);
                    continue;
                }
                _ => continue,
            };

            let before = snapshot(&cache);
            let size_before = cache.size();
            log.lock().unwrap().clear();

            let value = format!("{}{}", key, n);
            let stored = if force {
                cache.set_forced(key.clone(), value.clone(), size)
            } else {
                cache.set(key.clone(), value.clone(), size)
            };

            if stored {
                prop_assert!(cache.has(&key));
                prop_assert_eq!(cache.peek(&key), Some(&value));
                prop_assert_eq!(cache.bucket()[&key].size(), size);
            } else {
                prop_assert_eq!(snapshot(&cache), before);
                prop_assert_eq!(cache.size(), size_before);
                prop_assert!(log.lock().unwrap().is_empty(), "rejected set fired on_remove");
            }
        }
    }

    // on_remove fires exactly once for every key that leaves the cache, and
    // unforced sets only evict entries of lower priority than the new one.
    #[test]
    fn prop_evictions_are_observed_and_justified(
        capacity in 0..=MAX_TEST_CAPACITY,
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let (mut cache, log) = logged_cache(capacity, &["c"]);

        for (n, op) in ops.into_iter().enumerate() {
            let before = snapshot(&cache);
            log.lock().unwrap().clear();

            match op {
                CacheOp::Set { key, size, force } => {
                    let value = format!("{}{}", key, n);
                    let stored = if force {
                        cache.set_forced(key.clone(), value, size)
                    } else {
                        cache.set(key.clone(), value, size)
                    };

                    if stored && !force {
                        let count = before.get(&key).map_or(0, |(_, _, count)| *count);
                        let incoming = Priority::new(count, size);
                        for evicted in log.lock().unwrap().iter() {
                            let (_, evicted_size, evicted_count) = &before[evicted];
                            prop_assert!(Priority::new(*evicted_count, *evicted_size) < incoming);
                        }
                    }
                    for evicted in log.lock().unwrap().iter() {
                        prop_assert_ne!(evicted, &key);
                        prop_assert_ne!(evicted.as_str(), "c", "permanent key evicted");
                    }
                }
                CacheOp::Get { key } => { let _ = cache.get(&key); }
                CacheOp::Remove { key } => cache.remove(&key),
                CacheOp::RemoveAll => cache.remove_all(),
            }

            let after = snapshot(&cache);
            let vanished: BTreeSet<String> = before
                .keys()
                .filter(|k| !after.contains_key(*k))
                .cloned()
                .collect();
            let logged = log.lock().unwrap().clone();
            let logged_set: BTreeSet<String> = logged.iter().cloned().collect();

            prop_assert_eq!(logged.len(), logged_set.len(), "duplicate on_remove calls");
            prop_assert_eq!(vanished, logged_set);
        }
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity() {
        let mut cache: PriorityCache<String> = PriorityCache::new(0);

        assert!(!cache.set("a", "a".to_string(), 1));
        assert!(!cache.has("a"));

        assert!(cache.set("empty", String::new(), 0));
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_rejected_new_key_leaves_no_placeholder() {
        let mut cache: PriorityCache<String> = PriorityCache::new(4);
        cache.set("a", "a".to_string(), 4);
        cache.get("a").unwrap();

        assert!(!cache.set("b", "b".to_string(), 2));
        assert!(!cache.has("b"));
        assert_eq!(cache.keys(), vec!["a"]);
    }
}

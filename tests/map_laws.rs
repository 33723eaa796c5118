//! Property-based tests for `Map`.
//!
//! These tests verify that `Map` satisfies the expected persistence,
//! round-trip, size-accounting, and iteration laws using proptest,
//! including under a degenerate hasher.

use std::collections::HashMap;

use immutars::{Hasher, Map};
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating a `Map` together with a `HashMap` holding the
/// same bindings.
fn arbitrary_map(max_size: usize) -> impl Strategy<Value = (Map<i32, i32>, HashMap<i32, i32>)> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size).prop_map(|entries| {
        let mut map = Map::new();
        let mut reference = HashMap::new();
        for (key, value) in entries {
            map = map.set(key, value);
            reference.insert(key, value);
        }
        (map, reference)
    })
}

/// Hashes every key into eight buckets, exercising collision nodes on
/// almost every operation.
#[derive(Clone, Copy, Default)]
struct TinyRangeHasher;

impl Hasher<i32> for TinyRangeHasher {
    fn hash(&self, key: &i32) -> u32 {
        key.rem_euclid(8) as u32
    }

    fn equal(&self, a: &i32, b: &i32) -> bool {
        a == b
    }
}

// =============================================================================
// Get-Set Laws
// =============================================================================

proptest! {
    /// Law: get after set returns the bound value.
    #[test]
    fn prop_get_set_law((map, _) in arbitrary_map(50), key: i32, value: i32) {
        let updated = map.set(key, value);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }

    /// Law: set does not affect other keys, and the source map keeps its
    /// prior binding.
    #[test]
    fn prop_set_preserves_others((map, reference) in arbitrary_map(50), key: i32, value: i32) {
        let updated = map.set(key, value);
        for (other, expected) in &reference {
            if other != &key {
                prop_assert_eq!(updated.get(other), Some(expected));
            }
            prop_assert_eq!(map.get(other), Some(expected));
        }
    }

    /// Law: set of a fresh key grows the size by one; set of an existing
    /// key keeps the size.
    #[test]
    fn prop_set_size_accounting((map, reference) in arbitrary_map(50), key: i32, value: i32) {
        let updated = map.set(key, value);
        let expected = if reference.contains_key(&key) {
            reference.len()
        } else {
            reference.len() + 1
        };
        prop_assert_eq!(updated.len(), expected);
    }
}

// =============================================================================
// Delete Laws
// =============================================================================

proptest! {
    /// Law: get after delete misses, and the source map keeps its binding.
    #[test]
    fn prop_set_delete_get_misses((map, _) in arbitrary_map(50), key: i32, value: i32) {
        let bound = map.set(key, value);
        let removed = bound.delete(&key);
        prop_assert_eq!(removed.get(&key), None);
        prop_assert_eq!(bound.get(&key), Some(&value));
    }

    /// Law: delete of a present key shrinks the size by one; delete of an
    /// absent key keeps size and contents.
    #[test]
    fn prop_delete_size_accounting((map, reference) in arbitrary_map(50), key: i32) {
        let removed = map.delete(&key);
        let expected = if reference.contains_key(&key) {
            reference.len() - 1
        } else {
            reference.len()
        };
        prop_assert_eq!(removed.len(), expected);
    }
}

// =============================================================================
// Iteration Laws
// =============================================================================

proptest! {
    /// Law: iteration emits exactly the bindings of the map, each once.
    #[test]
    fn prop_iteration_covers_bindings((map, reference) in arbitrary_map(100)) {
        let mut emitted: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        emitted.sort_unstable();
        let mut expected: Vec<(i32, i32)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        expected.sort_unstable();
        prop_assert_eq!(emitted, expected);
    }

    /// Law: iteration order is reproducible for the same history.
    #[test]
    fn prop_iteration_is_deterministic(entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100)) {
        let build = || {
            let mut map = Map::new();
            for (key, value) in &entries {
                map = map.set(*key, *value);
            }
            map
        };
        let first: Vec<(i32, i32)> = build().iter().map(|(k, v)| (*k, *v)).collect();
        let second: Vec<(i32, i32)> = build().iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Degenerate Hasher Laws
// =============================================================================

proptest! {
    /// Law: a hasher with massive collisions still satisfies round-trip,
    /// size accounting, and iteration coverage.
    #[test]
    fn prop_tiny_hash_range_behaves(entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..60), probe: i32) {
        let mut map = Map::with_hasher(TinyRangeHasher);
        let mut reference = HashMap::new();
        for (key, value) in &entries {
            map = map.set(*key, *value);
            reference.insert(*key, *value);
        }

        prop_assert_eq!(map.len(), reference.len());
        for (key, expected) in &reference {
            prop_assert_eq!(map.get(key), Some(expected));
        }
        prop_assert_eq!(map.get(&probe).is_some(), reference.contains_key(&probe));

        let mut emitted: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        emitted.sort_unstable();
        let mut expected: Vec<(i32, i32)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        expected.sort_unstable();
        prop_assert_eq!(emitted, expected);

        for (key, _) in &entries {
            map = map.delete(key);
        }
        prop_assert_eq!(map.len(), 0);
    }
}

//! Hashing capability for [`Map`](crate::Map) and [`Set`](crate::Set) keys.
//!
//! The HAMT engine never hashes keys itself; it asks a [`Hasher`] for a
//! 32-bit hash and for key equality. [`DefaultHasher`] covers every key
//! type that implements `std::hash::Hash + Eq`; a custom implementation
//! can be supplied through `Map::with_hasher` for types that do not, or
//! when a specific hash distribution is wanted.

use std::hash::{Hash, Hasher as _};

/// Capability providing a 32-bit hash and equality over key type `K`.
///
/// The same hasher value must be used for the whole life of a map: the
/// trie's shape is a function of the hashes it was built with.
///
/// # Examples
///
/// ```rust
/// use immutars::{Hasher, Map};
///
/// // A deliberately narrow hasher: every key lands in one of 16 buckets.
/// #[derive(Clone, Copy, Default)]
/// struct NarrowHasher;
///
/// impl Hasher<u32> for NarrowHasher {
///     fn hash(&self, key: &u32) -> u32 {
///         key % 16
///     }
///     fn equal(&self, a: &u32, b: &u32) -> bool {
///         a == b
///     }
/// }
///
/// let map = Map::with_hasher(NarrowHasher).set(1u32, "one").set(17u32, "seventeen");
/// assert_eq!(map.get(&17), Some(&"seventeen"));
/// ```
pub trait Hasher<K> {
    /// Computes a 32-bit hash for the given key.
    fn hash(&self, key: &K) -> u32;

    /// Returns `true` if the two keys are equal.
    fn equal(&self, a: &K, b: &K) -> bool;
}

/// The built-in [`Hasher`] for keys implementing `Hash + Eq`.
///
/// Hashes with the standard library's `DefaultHasher` and folds the
/// 64-bit result down to the 32 bits the trie consumes. This covers
/// integers of all widths, strings, byte sequences, and any other
/// hashable key type.
///
/// # Examples
///
/// ```rust
/// use immutars::Map;
///
/// // `Map::new` uses `DefaultHasher` implicitly.
/// let map = Map::new().set("key".to_string(), 1);
/// assert_eq!(map.get(&"key".to_string()), Some(&1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultHasher;

impl<K: Hash + Eq> Hasher<K> for DefaultHasher {
    #[allow(clippy::cast_possible_truncation)]
    fn hash(&self, key: &K) -> u32 {
        let mut state = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut state);
        let wide = state.finish();
        // Fold the high bits in so short integer keys still spread.
        (wide ^ (wide >> 32)) as u32
    }

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_hasher_is_deterministic() {
        let hasher = DefaultHasher;
        let first = Hasher::<u64>::hash(&hasher, &12345);
        let second = Hasher::<u64>::hash(&hasher, &12345);
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_default_hasher_spreads_small_integers() {
        let hasher = DefaultHasher;
        let a = Hasher::<u64>::hash(&hasher, &1);
        let b = Hasher::<u64>::hash(&hasher, &2);
        assert_ne!(a, b);
    }

    #[rstest]
    fn test_default_hasher_equal_uses_eq() {
        let hasher = DefaultHasher;
        assert!(Hasher::<String>::equal(
            &hasher,
            &"abc".to_string(),
            &"abc".to_string()
        ));
        assert!(!Hasher::<String>::equal(
            &hasher,
            &"abc".to_string(),
            &"abd".to_string()
        ));
    }
}

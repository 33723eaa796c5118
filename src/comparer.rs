//! Ordering capability for [`SortedMap`](crate::SortedMap) and
//! [`SortedSet`](crate::SortedSet) keys.
//!
//! The B+tree engine orders keys exclusively through a [`Comparer`].
//! [`DefaultComparer`] covers every key type implementing `Ord`; a custom
//! implementation can be supplied through `SortedMap::with_comparer` to
//! impose a different order (reversed, case-insensitive, by a projected
//! field, and so on).

use std::cmp::Ordering;

/// Capability defining a strict total order over key type `K`.
///
/// The same comparer value must be used for the whole life of a map: the
/// tree's shape is a function of the order it was built with.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use immutars::{Comparer, SortedMap};
///
/// #[derive(Clone, Copy, Default)]
/// struct Reverse;
///
/// impl Comparer<i32> for Reverse {
///     fn compare(&self, a: &i32, b: &i32) -> Ordering {
///         b.cmp(a)
///     }
/// }
///
/// let map = SortedMap::with_comparer(Reverse)
///     .set(1, "one")
///     .set(2, "two")
///     .set(3, "three");
/// let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
/// assert_eq!(keys, vec![3, 2, 1]);
/// ```
pub trait Comparer<K> {
    /// Compares two keys, returning `Less`, `Equal`, or `Greater`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The built-in [`Comparer`] for keys implementing `Ord`.
///
/// # Examples
///
/// ```rust
/// use immutars::SortedMap;
///
/// // `SortedMap::new` uses `DefaultComparer` implicitly.
/// let map = SortedMap::new().set(2, "two").set(1, "one");
/// let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
/// assert_eq!(keys, vec![1, 2]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<K: Ord> Comparer<K> for DefaultComparer {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

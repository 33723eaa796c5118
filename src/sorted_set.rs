//! Persistent (immutable) ordered set.
//!
//! This module provides [`SortedSet`], an immutable ordered set that
//! stores its elements as the keys of a [`SortedMap`] with unit values.
//!
//! # Examples
//!
//! ```rust
//! use immutars::SortedSet;
//!
//! let set = SortedSet::new().set(3).set(1).set(2);
//!
//! // Elements are always in order
//! let collected: Vec<i32> = set.iter().copied().collect();
//! assert_eq!(collected, vec![1, 2, 3]);
//! ```

use std::fmt;
use std::iter::FromIterator;

use crate::comparer::{Comparer, DefaultComparer};
use crate::sorted_map::{SortedMap, SortedMapIterator};

// =============================================================================
// SortedSet Definition
// =============================================================================

/// A persistent (immutable) ordered set backed by [`SortedMap`].
///
/// The comparer type parameter defaults to [`DefaultComparer`], which
/// serves any element type implementing `Ord`;
/// [`SortedSet::with_comparer`] accepts a custom [`Comparer`]
/// capability.
///
/// # Examples
///
/// ```rust
/// use immutars::SortedSet;
///
/// let set = SortedSet::new().set("pear").set("apple");
/// assert!(set.contains(&"apple"));
/// let first = set.iter().next();
/// assert_eq!(first, Some(&"apple"));
/// ```
#[derive(Clone)]
pub struct SortedSet<T, C = DefaultComparer> {
    map: SortedMap<T, (), C>,
}

impl<T> SortedSet<T> {
    /// Creates a new empty set using [`DefaultComparer`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::SortedSet;
    ///
    /// let set: SortedSet<i32> = SortedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: SortedMap::new(),
        }
    }
}

impl<T, C> SortedSet<T, C> {
    /// Creates a new empty set using the given ordering capability.
    #[inline]
    #[must_use]
    pub const fn with_comparer(comparer: C) -> Self {
        Self {
            map: SortedMap::with_comparer(comparer),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T: Clone, C: Comparer<T> + Clone> SortedSet<T, C> {
    /// Returns `true` if the set contains the element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    /// Returns a new set including the element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::SortedSet;
    ///
    /// let set = SortedSet::new().set("a").set("a");
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub fn set(&self, value: T) -> Self {
        Self {
            map: self.map.set(value, ()),
        }
    }

    /// Returns a new set without the element.
    ///
    /// When the element is absent the same set value is returned,
    /// sharing its nodes with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn delete(&self, value: &T) -> Self {
        Self {
            map: self.map.delete(value),
        }
    }

    /// Returns an engine iterator positioned at the first element.
    ///
    /// The engine iterator supports seeking and bidirectional movement;
    /// for plain in-order traversal see [`iter`](Self::iter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::SortedSet;
    ///
    /// let set = SortedSet::new().set(1).set(2).set(3);
    /// let mut iterator = set.iterator();
    /// iterator.seek(&2);
    /// assert_eq!(iterator.next(), Some(&2));
    /// ```
    #[must_use]
    pub fn iterator(&self) -> SortedSetIterator<'_, T, C> {
        SortedSetIterator {
            iterator: self.map.iterator(),
        }
    }

    /// Returns an iterator over the elements in order.
    #[must_use]
    pub fn iter(&self) -> SortedSetIter<'_, T, C> {
        SortedSetIter {
            iterator: self.iterator(),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// A seekable, bidirectional iterator over the elements of a
/// [`SortedSet`].
pub struct SortedSetIterator<'a, T, C> {
    iterator: SortedMapIterator<'a, T, (), C>,
}

impl<'a, T, C: Comparer<T>> SortedSetIterator<'a, T, C> {
    /// Returns `true` if no more elements remain in the direction of
    /// travel.
    #[must_use]
    pub const fn done(&self) -> bool {
        self.iterator.done()
    }

    /// Positions the iterator at the first element.
    pub fn first(&mut self) {
        self.iterator.first();
    }

    /// Positions the iterator at the last element.
    pub fn last(&mut self) {
        self.iterator.last();
    }

    /// Positions the iterator at the first element not less than the
    /// given value. When no such element exists the iterator is done.
    pub fn seek(&mut self, value: &T) {
        self.iterator.seek(value);
    }

    /// Returns the current element and moves the iterator forward.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a T> {
        self.iterator.next().map(|(value, _)| value)
    }

    /// Returns the current element and moves the iterator backward.
    pub fn prev(&mut self) -> Option<&'a T> {
        self.iterator.prev().map(|(value, _)| value)
    }
}

/// A plain in-order iterator over the elements of a [`SortedSet`].
pub struct SortedSetIter<'a, T, C> {
    iterator: SortedSetIterator<'a, T, C>,
}

impl<'a, T, C: Comparer<T>> Iterator for SortedSetIter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for SortedSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Comparer<T> + Clone + Default> FromIterator<T> for SortedSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut builder = SortedSetBuilder::with_comparer(C::default());
        for value in iter {
            builder.set(value);
        }
        builder.build()
    }
}

impl<'a, T: Clone, C: Comparer<T> + Clone> IntoIterator for &'a SortedSet<T, C> {
    type Item = &'a T;
    type IntoIter = SortedSetIter<'a, T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Debug for SortedSet<T, C>
where
    T: Clone + fmt::Debug,
    C: Comparer<T> + Clone,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An efficient builder for [`SortedSet`] values.
///
/// Publishing with [`build`](Self::build) freezes the value; any use
/// after publishing is a programmer error and panics.
///
/// # Examples
///
/// ```rust
/// use immutars::SortedSetBuilder;
///
/// let mut builder = SortedSetBuilder::new();
/// for value in [3, 1, 2, 1] {
///     builder.set(value);
/// }
/// let set = builder.build();
/// let collected: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(collected, vec![1, 2, 3]);
/// ```
pub struct SortedSetBuilder<T, C = DefaultComparer> {
    set: Option<SortedSet<T, C>>,
}

impl<T: Clone> SortedSetBuilder<T> {
    /// Creates a builder starting from an empty set with
    /// [`DefaultComparer`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            set: Some(SortedSet::new()),
        }
    }
}

impl<T: Clone, C: Comparer<T> + Clone> SortedSetBuilder<T, C> {
    /// Creates a builder starting from an empty set with the given
    /// ordering capability.
    #[inline]
    #[must_use]
    pub const fn with_comparer(comparer: C) -> Self {
        Self {
            set: Some(SortedSet::with_comparer(comparer)),
        }
    }

    /// Publishes and returns the built set.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn build(&mut self) -> SortedSet<T, C> {
        self.set
            .take()
            .expect("immutable.SortedSetBuilder.Build(): duplicate call to fetch set")
    }

    /// Returns the current number of elements.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn len(&self) -> usize {
        self.target().len()
    }

    /// Returns `true` if the builder currently holds no elements.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target().is_empty()
    }

    /// Returns `true` if the builder currently contains the element.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.target().contains(value)
    }

    /// Includes the element.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn set(&mut self, value: T) {
        self.target_mut().map.set_mut(value, ());
    }

    /// Removes the element, if present.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn delete(&mut self, value: &T) {
        self.target_mut().map.delete_mut(value);
    }

    fn target(&self) -> &SortedSet<T, C> {
        self.set
            .as_ref()
            .expect("immutable.SortedSetBuilder: builder invalid after Build() invocation")
    }

    fn target_mut(&mut self) -> &mut SortedSet<T, C> {
        self.set
            .as_mut()
            .expect("immutable.SortedSetBuilder: builder invalid after Build() invocation")
    }
}

impl<T: Clone> Default for SortedSetBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

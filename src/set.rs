//! Persistent (immutable) hash set.
//!
//! This module provides [`Set`], an immutable hash set that stores its
//! elements as the keys of a [`Map`] with unit values.
//!
//! # Examples
//!
//! ```rust
//! use immutars::Set;
//!
//! let set = Set::new().set(1).set(2).set(3);
//!
//! assert!(set.contains(&1));
//! assert!(!set.contains(&4));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.set(4);
//! assert_eq!(set.len(), 3);     // Original unchanged
//! assert_eq!(updated.len(), 4); // New version
//! ```

use std::fmt;
use std::iter::FromIterator;

use crate::hasher::{DefaultHasher, Hasher};
use crate::map::{Map, MapIterator};

// =============================================================================
// Set Definition
// =============================================================================

/// A persistent (immutable) hash set backed by [`Map`].
///
/// The hasher type parameter defaults to [`DefaultHasher`], which serves
/// any element type implementing `Hash + Eq`; [`Set::with_hasher`]
/// accepts a custom [`Hasher`] capability.
///
/// # Examples
///
/// ```rust
/// use immutars::Set;
///
/// let set = Set::new().set(42);
/// assert!(set.contains(&42));
/// assert!(!set.contains(&0));
/// ```
#[derive(Clone)]
pub struct Set<T, H = DefaultHasher> {
    map: Map<T, (), H>,
}

impl<T> Set<T> {
    /// Creates a new empty set using [`DefaultHasher`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Set;
    ///
    /// let set: Set<i32> = Set::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { map: Map::new() }
    }
}

impl<T, H> Set<T, H> {
    /// Creates a new empty set using the given hashing capability.
    #[must_use]
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            map: Map::with_hasher(hasher),
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

impl<T: Clone, H: Hasher<T> + Clone> Set<T, H> {
    /// Returns `true` if the set contains the element.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    /// Returns a new set including the element.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Set;
    ///
    /// let set = Set::new().set("a").set("a");
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
    /// O(log32 N)
    #[must_use]
    pub fn delete(&self, value: &T) -> Self {
        Self {
            map: self.map.delete(value),
        }
    }

    /// Returns an engine iterator positioned at the first element.
    ///
    /// Iteration order is deterministic for a given hasher and history
    /// of operations, but otherwise unspecified.
    #[must_use]
    pub fn iterator(&self) -> SetIterator<'_, T> {
        SetIterator {
            iterator: self.map.iterator(),
        }
    }

    /// Returns an iterator over the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Set;
    ///
    /// let set: Set<i32> = (0..3).collect();
    /// let total: i32 = set.iter().sum();
    /// assert_eq!(total, 3);
    /// ```
    #[must_use]
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            iterator: self.iterator(),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// An iterator over the elements of a [`Set`].
///
/// Moves forward only, like the map iterator underneath it.
pub struct SetIterator<'a, T> {
    iterator: MapIterator<'a, T, ()>,
}

impl<'a, T> SetIterator<'a, T> {
    /// Returns `true` if no more elements remain.
    #[must_use]
    pub const fn done(&self) -> bool {
        self.iterator.done()
    }

    /// Repositions the iterator at the first element.
    pub fn first(&mut self) {
        self.iterator.first();
    }

    /// Returns the current element and moves the iterator forward.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a T> {
        self.iterator.next().map(|(value, _)| value)
    }
}

/// A plain iterator over the elements of a [`Set`].
pub struct SetIter<'a, T> {
    iterator: SetIterator<'a, T>,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for Set<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, H: Hasher<T> + Clone + Default> FromIterator<T> for Set<T, H> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut builder = SetBuilder::with_hasher(H::default());
        for value in iter {
            builder.set(value);
        }
        builder.build()
    }
}

impl<'a, T: Clone, H: Hasher<T> + Clone> IntoIterator for &'a Set<T, H> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> fmt::Debug for Set<T, H>
where
    T: Clone + fmt::Debug,
    H: Hasher<T> + Clone,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An efficient builder for [`Set`] values.
///
/// Publishing with [`build`](Self::build) freezes the value; any use
/// after publishing is a programmer error and panics.
///
/// # Examples
///
/// ```rust
/// use immutars::SetBuilder;
///
/// let mut builder = SetBuilder::new();
/// for value in 0..100 {
///     builder.set(value % 10);
/// }
/// let set = builder.build();
/// assert_eq!(set.len(), 10);
/// ```
pub struct SetBuilder<T, H = DefaultHasher> {
    set: Option<Set<T, H>>,
}

impl<T: Clone> SetBuilder<T> {
    /// Creates a builder starting from an empty set with
    /// [`DefaultHasher`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            set: Some(Set::new()),
        }
    }
}

impl<T: Clone, H: Hasher<T> + Clone> SetBuilder<T, H> {
    /// Creates a builder starting from an empty set with the given
    /// hashing capability.
    #[inline]
    #[must_use]
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            set: Some(Set::with_hasher(hasher)),
        }
    }

    /// Publishes and returns the built set.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn build(&mut self) -> Set<T, H> {
        self.set
            .take()
            .expect("immutable.SetBuilder.Build(): duplicate call to fetch set")
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

    fn target(&self) -> &Set<T, H> {
        self.set
            .as_ref()
            .expect("immutable.SetBuilder: builder invalid after Build() invocation")
    }

    fn target_mut(&mut self) -> &mut Set<T, H> {
        self.set
            .as_mut()
            .expect("immutable.SetBuilder: builder invalid after Build() invocation")
    }
}

impl<T: Clone> Default for SetBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

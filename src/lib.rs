//! # immutars
//!
//! Persistent (immutable) collections with structural sharing.
//!
//! ## Overview
//!
//! Every mutating operation on these collections returns a new value and
//! leaves the original untouched. New values share unmodified interior
//! nodes with their ancestors, so an update costs O(log32 N) time and
//! allocation rather than a full copy. The crate provides:
//!
//! - [`List`]: an indexed sequence backed by a bit-partitioned trie,
//!   with O(log32 N) append, prepend, update, and slice
//! - [`Map`]: an unordered key/value map backed by a Hash Array Mapped
//!   Trie (HAMT)
//! - [`SortedMap`]: an ordered key/value map backed by a B+tree
//! - [`Set`] / [`SortedSet`]: element-only façades over the two maps
//!
//! Each container has a companion builder ([`ListBuilder`],
//! [`MapBuilder`], [`SortedMapBuilder`], [`SetBuilder`],
//! [`SortedSetBuilder`]) that amortizes bursts of updates by mutating
//! uniquely-owned nodes in place, then publishes an ordinary persistent
//! value.
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes with `std::sync::Arc` instead of `std::rc::Rc`,
//!   making published collections `Send + Sync` at a small cost per clone
//!
//! ## Example
//!
//! ```rust
//! use immutars::Map;
//!
//! let map = Map::new().set("one", 1).set("two", 2);
//! let updated = map.set("one", 100);
//!
//! assert_eq!(map.get(&"one"), Some(&1));       // original unchanged
//! assert_eq!(updated.get(&"one"), Some(&100)); // new version
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparer;
mod entry;
mod hasher;
mod list;
mod map;
mod set;
mod sorted_map;
mod sorted_set;

pub use comparer::Comparer;
pub use comparer::DefaultComparer;
pub use hasher::DefaultHasher;
pub use hasher::Hasher;
pub use list::List;
pub use list::ListBuilder;
pub use list::ListIntoIter;
pub use list::ListIter;
pub use list::ListIterator;
pub use map::Map;
pub use map::MapBuilder;
pub use map::MapIter;
pub use map::MapIterator;
pub use set::Set;
pub use set::SetBuilder;
pub use set::SetIter;
pub use set::SetIterator;
pub use sorted_map::SortedMap;
pub use sorted_map::SortedMapBuilder;
pub use sorted_map::SortedMapIter;
pub use sorted_map::SortedMapIterator;
pub use sorted_set::SortedSet;
pub use sorted_set::SortedSetBuilder;
pub use sorted_set::SortedSetIter;
pub use sorted_set::SortedSetIterator;

/// Prelude module for convenient imports.
///
/// Re-exports the containers, builders, iterators, and capability traits.
///
/// # Usage
///
/// ```rust
/// use immutars::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comparer::{Comparer, DefaultComparer};
    pub use crate::hasher::{DefaultHasher, Hasher};
    pub use crate::list::{List, ListBuilder, ListIterator};
    pub use crate::map::{Map, MapBuilder, MapIterator};
    pub use crate::set::{Set, SetBuilder, SetIterator};
    pub use crate::sorted_map::{SortedMap, SortedMapBuilder, SortedMapIterator};
    pub use crate::sorted_set::{SortedSet, SortedSetBuilder, SortedSetIterator};
}

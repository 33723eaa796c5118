//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`Map`], an immutable hash map that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! `Map` is a Hash Array Mapped Trie: a 32-way branching trie navigated
//! by successive 5-bit fragments of a 32-bit key hash. It provides:
//!
//! - O(log32 N) get (effectively O(1) for practical sizes)
//! - O(log32 N) set
//! - O(log32 N) delete
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Internal Structure
//!
//! Node shape follows population. Very small maps are a flat array of
//! entries in insertion order. Sparse interior nodes hold a 32-bit
//! bitmap plus a compact child array indexed by popcount; once more than
//! sixteen children accumulate, the node spreads into a flat 32-slot
//! array indexed directly by the hash fragment. Single bindings live in
//! value nodes carrying their full hash; keys whose 32-bit hashes are
//! fully equal share a collision node and are told apart by key
//! equality. Deletion reverses each of these transitions.
//!
//! Hashing and key equality come from the map's [`Hasher`] capability;
//! [`DefaultHasher`] serves any `Hash + Eq` key type.
//!
//! # Examples
//!
//! ```rust
//! use immutars::Map;
//!
//! let map = Map::new()
//!     .set("one".to_string(), 1)
//!     .set("two".to_string(), 2);
//!
//! assert_eq!(map.get(&"one".to_string()), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.set("one".to_string(), 100);
//! assert_eq!(map.get(&"one".to_string()), Some(&1));       // Original unchanged
//! assert_eq!(updated.get(&"one".to_string()), Some(&100)); // New version
//! ```

use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use crate::ReferenceCounter;
use crate::entry::MapEntry;
use crate::hasher::{DefaultHasher, Hasher};

// =============================================================================
// Constants
// =============================================================================

/// Bits consumed from the hash per trie level
const NODE_BITS: u32 = 5;

/// Branching factor (2^5 = 32)
const NODE_SIZE: usize = 32;

/// Mask for extracting a 5-bit hash fragment
const NODE_MASK: u32 = 0x1F;

/// Maximum entries held by a flat array node before promotion
const MAX_ARRAY_SIZE: usize = 8;

/// Maximum children held by a bitmap-indexed node before promotion
const MAX_BITMAP_SIZE: usize = 16;

/// A 32-bit hash yields at most seven 5-bit levels plus a value or
/// collision node below them.
const MAX_ITERATOR_DEPTH: usize = 9;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the HAMT.
#[derive(Clone)]
enum MapNode<K, V> {
    /// Flat entry list used for very small maps; insertion-ordered
    Array(MapArrayNode<K, V>),
    /// Sparse interior node: bitmap plus popcount-compressed children
    Bitmap(MapBitmapIndexedNode<K, V>),
    /// Dense interior node: one slot per hash fragment
    HashArray(MapHashArrayNode<K, V>),
    /// A single binding together with its full key hash
    Value(MapValueNode<K, V>),
    /// Bindings whose 32-bit hashes are fully equal
    Collision(MapHashCollisionNode<K, V>),
}

#[derive(Clone)]
struct MapArrayNode<K, V> {
    entries: SmallVec<[MapEntry<K, V>; MAX_ARRAY_SIZE]>,
}

#[derive(Clone)]
struct MapBitmapIndexedNode<K, V> {
    bitmap: u32,
    nodes: Vec<ReferenceCounter<MapNode<K, V>>>,
}

#[derive(Clone)]
struct MapHashArrayNode<K, V> {
    count: usize,
    nodes: [Option<ReferenceCounter<MapNode<K, V>>>; NODE_SIZE],
}

#[derive(Clone)]
struct MapValueNode<K, V> {
    key_hash: u32,
    key: K,
    value: V,
}

#[derive(Clone)]
struct MapHashCollisionNode<K, V> {
    key_hash: u32,
    entries: Vec<MapEntry<K, V>>,
}

impl<K, V> MapNode<K, V> {
    fn empty() -> Self {
        Self::Array(MapArrayNode {
            entries: SmallVec::new(),
        })
    }
}

/// Extracts the 5-bit fragment of `hash` addressed at `shift`.
#[inline]
const fn fragment(hash: u32, shift: u32) -> u32 {
    (hash >> shift) & NODE_MASK
}

// =============================================================================
// Map Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// `Map` is an immutable data structure that uses structural sharing to
/// efficiently support functional programming patterns. The hasher type
/// parameter defaults to [`DefaultHasher`], which serves any key type
/// implementing `Hash + Eq`; [`Map::with_hasher`] accepts a custom
/// [`Hasher`] capability.
///
/// # Time Complexity
///
/// | Operation      | Complexity  |
/// |----------------|-------------|
/// | `new`          | O(1)        |
/// | `get`          | O(log32 N)  |
/// | `set`          | O(log32 N)  |
/// | `delete`       | O(log32 N)  |
/// | `contains_key` | O(log32 N)  |
/// | `len`          | O(1)        |
/// | `is_empty`     | O(1)        |
///
/// # Examples
///
/// ```rust
/// use immutars::Map;
///
/// let map = Map::new().set(1, "one");
/// assert_eq!(map.get(&1), Some(&"one"));
/// ```
#[derive(Clone)]
pub struct Map<K, V, H = DefaultHasher> {
    /// Number of bindings
    size: usize,
    /// Root node of the trie
    root: ReferenceCounter<MapNode<K, V>>,
    /// Hashing capability
    hasher: H,
}

impl<K, V> Map<K, V> {
    /// Creates a new empty map using [`DefaultHasher`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Map;
    ///
    /// let map: Map<String, i32> = Map::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHasher)
    }
}

impl<K, V, H> Map<K, V, H> {
    /// Creates a new empty map using the given hashing capability.
    ///
    /// The same capability value is carried by every map derived from
    /// this one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::{DefaultHasher, Map};
    ///
    /// let map: Map<String, i32, DefaultHasher> = Map::with_hasher(DefaultHasher);
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            size: 0,
            root: ReferenceCounter::new(MapNode::empty()),
            hasher,
        }
    }

    /// Returns the number of bindings in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no bindings.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl<K: Clone, V: Clone, H: Hasher<K> + Clone> Map<K, V, H> {
    /// Returns a reference to the value bound to the key.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Map;
    ///
    /// let map = Map::new().set("hello", 42);
    /// assert_eq!(map.get(&"hello"), Some(&42));
    /// assert_eq!(map.get(&"world"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash(key);
        Self::find(&self.root, 0, hash, key, &self.hasher)
    }

    /// Returns `true` if the map contains a binding for the key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns a new map with the key bound to the given value.
    ///
    /// An existing binding for the key is overwritten.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Map;
    ///
    /// let first = Map::new().set("key", 1);
    /// let second = first.set("key", 2);
    ///
    /// assert_eq!(first.get(&"key"), Some(&1));  // Original unchanged
    /// assert_eq!(second.get(&"key"), Some(&2)); // New version
    /// ```
    #[must_use]
    pub fn set(&self, key: K, value: V) -> Self {
        let mut map = self.clone();
        map.set_mut(key, value);
        map
    }

    /// Returns a new map without a binding for the key.
    ///
    /// When the key is absent the same map value is returned, sharing
    /// its root with `self`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Map;
    ///
    /// let map = Map::new().set("a", 1).set("b", 2);
    /// let removed = map.delete(&"a");
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&"a"), None);
    /// ```
    #[must_use]
    pub fn delete(&self, key: &K) -> Self {
        if !self.contains_key(key) {
            return self.clone();
        }
        let mut map = self.clone();
        map.delete_mut(key);
        map
    }

    /// Returns an engine iterator positioned at the first binding.
    ///
    /// Iteration order is deterministic for a given hasher and history
    /// of operations, but is neither sorted nor globally
    /// insertion-ordered.
    #[must_use]
    pub fn iterator(&self) -> MapIterator<'_, K, V> {
        let mut iterator = MapIterator {
            root: &self.root,
            stack: [None; MAX_ITERATOR_DEPTH],
            depth: None,
        };
        iterator.first();
        iterator
    }

    /// Returns an iterator over key/value pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::Map;
    ///
    /// let map = Map::new().set("a", 1).set("b", 2);
    /// let total: i32 = map.iter().map(|(_, value)| value).sum();
    /// assert_eq!(total, 3);
    /// ```
    #[must_use]
    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter {
            iterator: self.iterator(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // -------------------------------------------------------------------------
    // Engine: in-place variants shared by persistent wrappers and the builder
    // -------------------------------------------------------------------------

    pub(crate) fn set_mut(&mut self, key: K, value: V) {
        let hash = self.hasher.hash(&key);
        let mut resized = false;
        Self::node_set(
            &mut self.root,
            0,
            hash,
            key,
            value,
            &self.hasher,
            &mut resized,
        );
        if resized {
            self.size += 1;
        }
    }

    pub(crate) fn delete_mut(&mut self, key: &K) {
        let hash = self.hasher.hash(key);
        let mut resized = false;
        let emptied = Self::node_delete(&mut self.root, 0, hash, key, &self.hasher, &mut resized);
        if emptied {
            self.root = ReferenceCounter::new(MapNode::empty());
        }
        if resized {
            self.size -= 1;
        }
    }

    /// Recursive lookup.
    fn find<'a>(
        node: &'a MapNode<K, V>,
        shift: u32,
        hash: u32,
        key: &K,
        hasher: &H,
    ) -> Option<&'a V> {
        match node {
            MapNode::Array(array) => array
                .entries
                .iter()
                .find(|entry| hasher.equal(&entry.key, key))
                .map(|entry| &entry.value),
            MapNode::Bitmap(bitmap) => {
                let bit = 1u32 << fragment(hash, shift);
                if bitmap.bitmap & bit == 0 {
                    return None;
                }
                let position = (bitmap.bitmap & (bit - 1)).count_ones() as usize;
                Self::find(&bitmap.nodes[position], shift + NODE_BITS, hash, key, hasher)
            }
            MapNode::HashArray(hash_array) => {
                let slot = fragment(hash, shift) as usize;
                let child = hash_array.nodes[slot].as_deref()?;
                Self::find(child, shift + NODE_BITS, hash, key, hasher)
            }
            MapNode::Value(value_node) => {
                if value_node.key_hash == hash && hasher.equal(&value_node.key, key) {
                    Some(&value_node.value)
                } else {
                    None
                }
            }
            MapNode::Collision(collision) => {
                if collision.key_hash != hash {
                    return None;
                }
                collision
                    .entries
                    .iter()
                    .find(|entry| hasher.equal(&entry.key, key))
                    .map(|entry| &entry.value)
            }
        }
    }

    /// Recursive insert/overwrite. Sets `resized` exactly when the total
    /// number of bindings grew. Shared nodes on the path are copied.
    fn node_set(
        node: &mut ReferenceCounter<MapNode<K, V>>,
        shift: u32,
        hash: u32,
        key: K,
        value: V,
        hasher: &H,
        resized: &mut bool,
    ) {
        match ReferenceCounter::make_mut(node) {
            MapNode::Array(array) => {
                if let Some(entry) = array
                    .entries
                    .iter_mut()
                    .find(|entry| hasher.equal(&entry.key, &key))
                {
                    entry.value = value;
                    return;
                }
                if array.entries.len() >= MAX_ARRAY_SIZE {
                    // Redistribute into a bitmap trie rooted at this shift.
                    let entries = std::mem::take(&mut array.entries);
                    let mut replacement = ReferenceCounter::new(MapNode::Bitmap(
                        MapBitmapIndexedNode {
                            bitmap: 0,
                            nodes: Vec::new(),
                        },
                    ));
                    let mut ignored = false;
                    for entry in entries {
                        let entry_hash = hasher.hash(&entry.key);
                        Self::node_set(
                            &mut replacement,
                            shift,
                            entry_hash,
                            entry.key,
                            entry.value,
                            hasher,
                            &mut ignored,
                        );
                    }
                    Self::node_set(&mut replacement, shift, hash, key, value, hasher, resized);
                    *node = replacement;
                    return;
                }
                array.entries.push(MapEntry::new(key, value));
                *resized = true;
            }
            MapNode::Bitmap(bitmap) => {
                let bit = 1u32 << fragment(hash, shift);
                let position = (bitmap.bitmap & (bit - 1)).count_ones() as usize;
                if bitmap.bitmap & bit == 0 {
                    bitmap.nodes.insert(
                        position,
                        ReferenceCounter::new(MapNode::Value(MapValueNode {
                            key_hash: hash,
                            key,
                            value,
                        })),
                    );
                    bitmap.bitmap |= bit;
                    *resized = true;
                    if bitmap.nodes.len() > MAX_BITMAP_SIZE {
                        // Spread into a flat 32-slot node.
                        let spread_bitmap = bitmap.bitmap;
                        let spread_nodes = std::mem::take(&mut bitmap.nodes);
                        let mut children: [Option<ReferenceCounter<MapNode<K, V>>>; NODE_SIZE] =
                            std::array::from_fn(|_| None);
                        let mut source = spread_nodes.into_iter();
                        for (slot, child) in children.iter_mut().enumerate() {
                            if spread_bitmap & (1u32 << slot) != 0 {
                                *child = source.next();
                            }
                        }
                        *node = ReferenceCounter::new(MapNode::HashArray(MapHashArrayNode {
                            count: MAX_BITMAP_SIZE + 1,
                            nodes: children,
                        }));
                    }
                } else {
                    Self::node_set(
                        &mut bitmap.nodes[position],
                        shift + NODE_BITS,
                        hash,
                        key,
                        value,
                        hasher,
                        resized,
                    );
                }
            }
            MapNode::HashArray(hash_array) => {
                let slot = fragment(hash, shift) as usize;
                if hash_array.nodes[slot].is_none() {
                    hash_array.nodes[slot] =
                        Some(ReferenceCounter::new(MapNode::Value(MapValueNode {
                            key_hash: hash,
                            key,
                            value,
                        })));
                    hash_array.count += 1;
                    *resized = true;
                } else if let Some(child) = hash_array.nodes[slot].as_mut() {
                    Self::node_set(child, shift + NODE_BITS, hash, key, value, hasher, resized);
                }
            }
            MapNode::Value(value_node) => {
                if value_node.key_hash == hash && hasher.equal(&value_node.key, &key) {
                    value_node.value = value;
                    return;
                }
                if value_node.key_hash == hash {
                    // Equal 32-bit hashes, distinct keys.
                    let existing = MapEntry::new(value_node.key.clone(), value_node.value.clone());
                    *node = ReferenceCounter::new(MapNode::Collision(MapHashCollisionNode {
                        key_hash: hash,
                        entries: vec![existing, MapEntry::new(key, value)],
                    }));
                    *resized = true;
                    return;
                }
                let existing = MapValueNode {
                    key_hash: value_node.key_hash,
                    key: value_node.key.clone(),
                    value: value_node.value.clone(),
                };
                let existing_hash = existing.key_hash;
                let merged = Self::merge_into_bitmap(
                    ReferenceCounter::new(MapNode::Value(existing)),
                    existing_hash,
                    MapValueNode {
                        key_hash: hash,
                        key,
                        value,
                    },
                    shift,
                );
                *node = ReferenceCounter::new(merged);
                *resized = true;
            }
            MapNode::Collision(collision) => {
                if collision.key_hash == hash {
                    if let Some(entry) = collision
                        .entries
                        .iter_mut()
                        .find(|entry| hasher.equal(&entry.key, &key))
                    {
                        entry.value = value;
                        return;
                    }
                    collision.entries.push(MapEntry::new(key, value));
                    *resized = true;
                    return;
                }
                let collision_hash = collision.key_hash;
                let existing = ReferenceCounter::new(MapNode::Collision(collision.clone()));
                let merged = Self::merge_into_bitmap(
                    existing,
                    collision_hash,
                    MapValueNode {
                        key_hash: hash,
                        key,
                        value,
                    },
                    shift,
                );
                *node = ReferenceCounter::new(merged);
                *resized = true;
            }
        }
    }

    /// Builds the bitmap levels that separate an existing subtree from a
    /// new value whose hash diverges from it somewhere above `shift`.
    fn merge_into_bitmap(
        existing: ReferenceCounter<MapNode<K, V>>,
        existing_hash: u32,
        addition: MapValueNode<K, V>,
        shift: u32,
    ) -> MapNode<K, V> {
        let existing_fragment = fragment(existing_hash, shift);
        let addition_fragment = fragment(addition.key_hash, shift);

        if existing_fragment == addition_fragment {
            let child =
                Self::merge_into_bitmap(existing, existing_hash, addition, shift + NODE_BITS);
            return MapNode::Bitmap(MapBitmapIndexedNode {
                bitmap: 1u32 << existing_fragment,
                nodes: vec![ReferenceCounter::new(child)],
            });
        }

        let bitmap = (1u32 << existing_fragment) | (1u32 << addition_fragment);
        let addition = ReferenceCounter::new(MapNode::Value(addition));
        let nodes = if existing_fragment < addition_fragment {
            vec![existing, addition]
        } else {
            vec![addition, existing]
        };
        MapNode::Bitmap(MapBitmapIndexedNode { bitmap, nodes })
    }

    /// Recursive removal. Returns `true` when this node became empty and
    /// the caller should drop its slot. Sets `resized` exactly when a
    /// binding was removed.
    fn node_delete(
        node: &mut ReferenceCounter<MapNode<K, V>>,
        shift: u32,
        hash: u32,
        key: &K,
        hasher: &H,
        resized: &mut bool,
    ) -> bool {
        let mut collapse: Option<ReferenceCounter<MapNode<K, V>>> = None;

        let emptied = match ReferenceCounter::make_mut(node) {
            MapNode::Array(array) => {
                let Some(position) = array
                    .entries
                    .iter()
                    .position(|entry| hasher.equal(&entry.key, key))
                else {
                    return false;
                };
                array.entries.remove(position);
                *resized = true;
                array.entries.is_empty()
            }
            MapNode::Bitmap(bitmap) => {
                let bit = 1u32 << fragment(hash, shift);
                if bitmap.bitmap & bit == 0 {
                    return false;
                }
                let position = (bitmap.bitmap & (bit - 1)).count_ones() as usize;
                let child_emptied = Self::node_delete(
                    &mut bitmap.nodes[position],
                    shift + NODE_BITS,
                    hash,
                    key,
                    hasher,
                    resized,
                );
                if child_emptied {
                    bitmap.nodes.remove(position);
                    bitmap.bitmap &= !bit;
                    if bitmap.nodes.is_empty() {
                        return true;
                    }
                }
                // A lone value child replaces the whole bitmap node.
                if bitmap.nodes.len() == 1
                    && matches!(bitmap.nodes[0].as_ref(), MapNode::Value(_))
                {
                    collapse = Some(bitmap.nodes[0].clone());
                }
                false
            }
            MapNode::HashArray(hash_array) => {
                let slot = fragment(hash, shift) as usize;
                let Some(child) = hash_array.nodes[slot].as_mut() else {
                    return false;
                };
                let child_emptied =
                    Self::node_delete(child, shift + NODE_BITS, hash, key, hasher, resized);
                if child_emptied {
                    hash_array.nodes[slot] = None;
                    hash_array.count -= 1;
                    if hash_array.count <= MAX_BITMAP_SIZE {
                        // Compact back into a bitmap-indexed node.
                        let mut bitmap = 0u32;
                        let mut nodes = Vec::with_capacity(hash_array.count);
                        for (index, child) in hash_array.nodes.iter_mut().enumerate() {
                            if let Some(child) = child.take() {
                                bitmap |= 1u32 << index;
                                nodes.push(child);
                            }
                        }
                        collapse = Some(ReferenceCounter::new(MapNode::Bitmap(
                            MapBitmapIndexedNode { bitmap, nodes },
                        )));
                    }
                }
                false
            }
            MapNode::Value(value_node) => {
                if value_node.key_hash == hash && hasher.equal(&value_node.key, key) {
                    *resized = true;
                    true
                } else {
                    false
                }
            }
            MapNode::Collision(collision) => {
                let Some(position) = (collision.key_hash == hash)
                    .then(|| {
                        collision
                            .entries
                            .iter()
                            .position(|entry| hasher.equal(&entry.key, key))
                    })
                    .flatten()
                else {
                    return false;
                };
                collision.entries.remove(position);
                *resized = true;
                if collision.entries.len() == 1 {
                    let survivor = collision.entries.remove(0);
                    collapse = Some(ReferenceCounter::new(MapNode::Value(MapValueNode {
                        key_hash: collision.key_hash,
                        key: survivor.key,
                        value: survivor.value,
                    })));
                }
                false
            }
        };

        if let Some(replacement) = collapse {
            *node = replacement;
        }
        emptied
    }
}

// =============================================================================
// Engine Iterator
// =============================================================================

/// An iterator over the bindings of a [`Map`].
///
/// The iterator keeps a bounded stack of trie positions and walks the
/// children of every node left to right; array and collision nodes are
/// emitted in their stored (insertion) order. It moves forward only.
pub struct MapIterator<'a, K, V> {
    root: &'a ReferenceCounter<MapNode<K, V>>,
    stack: [Option<(&'a MapNode<K, V>, usize)>; MAX_ITERATOR_DEPTH],
    depth: Option<usize>,
}

impl<'a, K, V> MapIterator<'a, K, V> {
    /// Returns `true` if no more bindings remain.
    #[must_use]
    pub const fn done(&self) -> bool {
        self.depth.is_none()
    }

    /// Repositions the iterator at the first binding.
    pub fn first(&mut self) {
        self.stack[0] = Some((self.root.as_ref(), 0));
        self.depth = Some(0);
        self.settle();
    }

    /// Returns the current binding and moves the iterator forward.
    ///
    /// Returns `None` once iteration is done; further calls keep
    /// returning `None`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let depth = self.depth?;
        let (node, index) = self.stack[depth]?;

        let binding = match node {
            MapNode::Array(array) => {
                let entry = &array.entries[index];
                (&entry.key, &entry.value)
            }
            MapNode::Collision(collision) => {
                let entry = &collision.entries[index];
                (&entry.key, &entry.value)
            }
            MapNode::Value(value_node) => (&value_node.key, &value_node.value),
            // Settle never parks on an interior node.
            MapNode::Bitmap(_) | MapNode::HashArray(_) => return None,
        };

        self.stack[depth] = Some((node, index + 1));
        self.settle();
        Some(binding)
    }

    /// Moves the stack to the next element-bearing position, popping
    /// exhausted frames.
    fn settle(&mut self) {
        while let Some(depth) = self.depth {
            let Some((node, index)) = self.stack[depth] else {
                self.depth = None;
                return;
            };
            match node {
                MapNode::Array(array) => {
                    if index < array.entries.len() {
                        return;
                    }
                    self.pop(depth);
                }
                MapNode::Collision(collision) => {
                    if index < collision.entries.len() {
                        return;
                    }
                    self.pop(depth);
                }
                MapNode::Value(_) => {
                    if index == 0 {
                        return;
                    }
                    self.pop(depth);
                }
                MapNode::Bitmap(bitmap) => {
                    if index < bitmap.nodes.len() {
                        self.stack[depth] = Some((node, index + 1));
                        self.stack[depth + 1] = Some((bitmap.nodes[index].as_ref(), 0));
                        self.depth = Some(depth + 1);
                    } else {
                        self.pop(depth);
                    }
                }
                MapNode::HashArray(hash_array) => {
                    let next_slot = (index..NODE_SIZE)
                        .find(|&slot| hash_array.nodes[slot].is_some());
                    if let Some(slot) = next_slot {
                        self.stack[depth] = Some((node, slot + 1));
                        if let Some(child) = hash_array.nodes[slot].as_ref() {
                            self.stack[depth + 1] = Some((child.as_ref(), 0));
                            self.depth = Some(depth + 1);
                        }
                    } else {
                        self.pop(depth);
                    }
                }
            }
        }
    }

    fn pop(&mut self, depth: usize) {
        self.depth = depth.checked_sub(1);
    }
}

/// A plain iterator over key/value pairs of a [`Map`].
pub struct MapIter<'a, K, V> {
    iterator: MapIterator<'a, K, V>,
}

impl<'a, K, V> Iterator for MapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for Map<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, H: Hasher<K> + Clone + Default> FromIterator<(K, V)> for Map<K, V, H> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = MapBuilder::with_hasher(H::default());
        for (key, value) in iter {
            builder.set(key, value);
        }
        builder.map()
    }
}

impl<'a, K: Clone, V: Clone, H: Hasher<K> + Clone> IntoIterator for &'a Map<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> fmt::Debug for Map<K, V, H>
where
    K: Clone + fmt::Debug,
    V: Clone + fmt::Debug,
    H: Hasher<K> + Clone,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An efficient builder for [`Map`] values.
///
/// The builder owns its nodes exclusively, so repeated updates edit them
/// in place instead of copying a path per operation. Publishing with
/// [`map`](Self::map) freezes the value; any use after publishing is a
/// programmer error and panics.
///
/// # Examples
///
/// ```rust
/// use immutars::MapBuilder;
///
/// let mut builder = MapBuilder::new();
/// for value in 0..100 {
///     builder.set(value, value * 2);
/// }
/// let map = builder.map();
/// assert_eq!(map.len(), 100);
/// assert_eq!(map.get(&21), Some(&42));
/// ```
pub struct MapBuilder<K, V, H = DefaultHasher> {
    map: Option<Map<K, V, H>>,
}

impl<K: Clone, V: Clone> MapBuilder<K, V> {
    /// Creates a builder starting from an empty map with
    /// [`DefaultHasher`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: Some(Map::new()),
        }
    }
}

impl<K: Clone, V: Clone, H: Hasher<K> + Clone> MapBuilder<K, V, H> {
    /// Creates a builder starting from an empty map with the given
    /// hashing capability.
    #[inline]
    #[must_use]
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            map: Some(Map::with_hasher(hasher)),
        }
    }

    /// Creates a builder starting from an existing map.
    ///
    /// The source map is unaffected by any subsequent builder updates.
    #[inline]
    #[must_use]
    pub const fn from_map(map: Map<K, V, H>) -> Self {
        Self { map: Some(map) }
    }

    /// Publishes and returns the built map.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn map(&mut self) -> Map<K, V, H> {
        self.map
            .take()
            .expect("immutable.MapBuilder.Map(): duplicate call to fetch map")
    }

    /// Returns the current number of bindings.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn len(&self) -> usize {
        self.target().len()
    }

    /// Returns `true` if the builder currently holds no bindings.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target().is_empty()
    }

    /// Returns a reference to the value bound to the key.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.target().get(key)
    }

    /// Binds the key to the given value.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn set(&mut self, key: K, value: V) {
        self.target_mut().set_mut(key, value);
    }

    /// Removes the binding for the key, if present.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn delete(&mut self, key: &K) {
        self.target_mut().delete_mut(key);
    }

    /// Returns an engine iterator over the current bindings.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn iterator(&self) -> MapIterator<'_, K, V> {
        self.target().iterator()
    }

    fn target(&self) -> &Map<K, V, H> {
        self.map
            .as_ref()
            .expect("immutable.MapBuilder: builder invalid after Map() invocation")
    }

    fn target_mut(&mut self) -> &mut Map<K, V, H> {
        self.map
            .as_mut()
            .expect("immutable.MapBuilder: builder invalid after Map() invocation")
    }
}

impl<K: Clone, V: Clone> Default for MapBuilder<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

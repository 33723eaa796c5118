//! Persistent (immutable) list based on a bit-partitioned trie.
//!
//! This module provides [`List`], an immutable dynamic array that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! `List` is a 32-way branching trie in the style of Clojure's
//! `PersistentVector`, extended with a logical-to-physical index offset
//! (the *origin*) so the sequence can grow at either end. It provides:
//!
//! - O(log32 N) random access (effectively O(1) for practical sizes)
//! - O(log32 N) append and prepend
//! - O(log32 N) positional update
//! - O(log32 N) slicing at either end
//! - O(1) len and `is_empty`
//!
//! All operations return new lists without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Internal Structure
//!
//! A list holds its logical size, the origin offset, the trie height,
//! and the root node. Logical index `i` lives at physical index
//! `i + origin`; each trie level consumes five bits of the physical
//! index. Appending past the right edge wraps the root in a new level;
//! prepending past the left edge does the same while shifting the origin
//! into the freshly created space. Slicing adjusts origin and size and
//! clears the slots of the boundary leaves that fall outside the new
//! range, so dropped elements are released.
//!
//! # Examples
//!
//! ```rust
//! use immutars::List;
//!
//! let list = List::new().append(1).append(2).append(3);
//!
//! assert_eq!(list.get(0), &1);
//! assert_eq!(list.get(1), &2);
//! assert_eq!(list.get(2), &3);
//!
//! // Structural sharing: the original list is preserved
//! let extended = list.append(4);
//! assert_eq!(list.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4); // New list
//! ```

use std::fmt;
use std::iter::FromIterator;

use crate::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const NODE_SIZE: usize = 32;

/// Bits per level in the trie
const NODE_BITS: usize = 5;

/// Bit mask for extracting a slot index within a node
const NODE_MASK: usize = NODE_SIZE - 1;

/// Upper bound on trie height for iterator stacks; a 64-bit physical
/// index space divided into 5-bit fragments never exceeds this.
const MAX_ITERATOR_DEPTH: usize = 14;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the trie.
#[derive(Clone)]
enum ListNode<T> {
    /// Branch node containing child nodes
    Branch(ListBranchNode<T>),
    /// Leaf node containing elements
    Leaf(ListLeafNode<T>),
}

/// A branch holds up to 32 children plus a bitmask of the slots in use.
#[derive(Clone)]
struct ListBranchNode<T> {
    children: [Option<ReferenceCounter<ListNode<T>>>; NODE_SIZE],
    occupied: u32,
}

impl<T> ListBranchNode<T> {
    fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            occupied: 0,
        }
    }

    /// Stores a child and keeps the occupancy bitmask in sync.
    fn set_child(&mut self, slot: usize, child: Option<ReferenceCounter<ListNode<T>>>) {
        if child.is_some() {
            self.occupied |= 1 << slot;
        } else {
            self.occupied &= !(1 << slot);
        }
        self.children[slot] = child;
    }
}

/// A leaf holds up to 32 elements plus a bitmask of the slots in use.
#[derive(Clone)]
struct ListLeafNode<T> {
    elements: [Option<T>; NODE_SIZE],
    occupied: u32,
}

impl<T> ListLeafNode<T> {
    fn new() -> Self {
        Self {
            elements: std::array::from_fn(|_| None),
            occupied: 0,
        }
    }

    /// Stores an element and keeps the occupancy bitmask in sync.
    fn set_element(&mut self, slot: usize, element: Option<T>) {
        if element.is_some() {
            self.occupied |= 1 << slot;
        } else {
            self.occupied &= !(1 << slot);
        }
        self.elements[slot] = element;
    }
}

// =============================================================================
// List Definition
// =============================================================================

/// A persistent (immutable) list based on a bit-partitioned trie.
///
/// `List` is an immutable data structure that uses structural sharing to
/// efficiently support functional programming patterns.
///
/// # Time Complexity
///
/// | Operation  | Complexity   |
/// |------------|--------------|
/// | `new`      | O(1)         |
/// | `get`      | O(log32 N)   |
/// | `set`      | O(log32 N)   |
/// | `append`   | O(log32 N)   |
/// | `prepend`  | O(log32 N)   |
/// | `slice`    | O(log32 N)   |
/// | `len`      | O(1)         |
/// | `is_empty` | O(1)         |
///
/// # Examples
///
/// ```rust
/// use immutars::List;
///
/// let list: List<i32> = (0..100).collect();
/// assert_eq!(list.len(), 100);
/// assert_eq!(list.get(50), &50);
/// ```
#[derive(Clone)]
pub struct List<T> {
    /// Logical number of elements
    size: usize,
    /// Logical-to-physical index offset
    origin: usize,
    /// Trie levels above the leaves
    height: usize,
    /// Root node; `None` only for the empty list
    root: Option<ReferenceCounter<ListNode<T>>>,
}

impl<T> List<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            size: 0,
            origin: 0,
            height: 0,
            root: None,
        }
    }

    /// Returns the number of elements in the list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=5).collect();
    /// assert_eq!(list.len(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Physical capacity of the current trie shape.
    #[inline]
    const fn capacity(&self) -> usize {
        1 << ((self.height + 1) * NODE_BITS)
    }

    /// Looks up the element at the given logical index.
    fn lookup(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }

        let position = self.origin + index;
        let mut node = self.root.as_deref()?;
        let mut level = self.height;

        while level > 0 {
            let ListNode::Branch(branch) = node else {
                return None;
            };
            let slot = (position >> (level * NODE_BITS)) & NODE_MASK;
            node = branch.children[slot].as_deref()?;
            level -= 1;
        }

        let ListNode::Leaf(leaf) = node else {
            return None;
        };
        leaf.elements[position & NODE_MASK].as_ref()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics with `immutable.List.Get: index <i> out of bounds` when the
    /// index is not less than [`len`](Self::len).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=5).collect();
    /// assert_eq!(list.get(0), &1);
    /// assert_eq!(list.get(4), &5);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> &T {
        self.lookup(index).map_or_else(
            || panic!("immutable.List.Get: index {index} out of bounds"),
            |value| value,
        )
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.lookup(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        if self.size == 0 {
            None
        } else {
            self.lookup(self.size - 1)
        }
    }

    /// Returns an engine iterator positioned at the first element.
    ///
    /// The engine iterator supports seeking and bidirectional movement;
    /// for plain front-to-back traversal see [`iter`](Self::iter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<&str> = ["foo", "bar"].into_iter().collect();
    /// let mut iterator = list.iterator();
    /// assert_eq!(iterator.next(), Some((0, &"foo")));
    /// assert_eq!(iterator.next(), Some((1, &"bar")));
    /// assert!(iterator.done());
    /// ```
    #[must_use]
    pub fn iterator(&self) -> ListIterator<'_, T> {
        let mut iterator = ListIterator {
            list: self,
            index: 0,
            exhausted: false,
            stack: [None; MAX_ITERATOR_DEPTH],
            depth: 0,
        };
        iterator.first();
        iterator
    }

    /// Returns an iterator over references to the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=3).collect();
    /// let collected: Vec<&i32> = list.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        ListIter {
            iterator: self.iterator(),
        }
    }
}

impl<T: Clone> List<T> {
    /// Returns a new list with the element appended at the end.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list = List::new().append("foo").append("bar");
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.get(1), &"bar");
    /// ```
    #[must_use]
    pub fn append(&self, value: T) -> Self {
        let mut list = self.clone();
        list.append_mut(value);
        list
    }

    /// Returns a new list with the element inserted at the front.
    ///
    /// All existing indices shift up by one.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list = List::new().prepend("foo").prepend("bar");
    /// assert_eq!(list.get(0), &"bar");
    /// assert_eq!(list.get(1), &"foo");
    /// ```
    #[must_use]
    pub fn prepend(&self, value: T) -> Self {
        let mut list = self.clone();
        list.prepend_mut(value);
        list
    }

    /// Returns a new list with the element at the given index replaced.
    ///
    /// # Panics
    ///
    /// Panics with `immutable.List.Set: index <i> out of bounds` when the
    /// index is not less than [`len`](Self::len).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<&str> = ["foo", "bar"].into_iter().collect();
    /// let updated = list.set(1, "baz");
    /// assert_eq!(updated.get(1), &"baz");
    /// assert_eq!(list.get(1), &"bar"); // Original unchanged
    /// ```
    #[must_use]
    pub fn set(&self, index: usize, value: T) -> Self {
        assert!(
            index < self.size,
            "immutable.List.Set: index {index} out of bounds"
        );
        let mut list = self.clone();
        list.set_mut(index, value);
        list
    }

    /// Returns a new list covering `[start, end)` of this list.
    ///
    /// Boundary leaves of the new list have their out-of-range slots
    /// cleared so that sliced-away elements are released.
    ///
    /// # Panics
    ///
    /// Panics with the `immutable.List.Slice` messages when `start` or
    /// `end` exceed [`len`](Self::len) or when `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (0..10).collect();
    /// let sliced = list.slice(2, 5);
    ///
    /// assert_eq!(sliced.len(), 3);
    /// assert_eq!(sliced.get(0), &2);
    /// assert_eq!(sliced.get(2), &4);
    /// ```
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        assert!(
            start <= self.size,
            "immutable.List.Slice: start index {start} out of bounds"
        );
        assert!(
            end <= self.size,
            "immutable.List.Slice: end index {end} out of bounds"
        );
        assert!(
            start <= end,
            "immutable.List.Slice: invalid slice index: [{start}:{end}]"
        );

        if start == end {
            return Self::new();
        }
        if start == 0 && end == self.size {
            return self.clone();
        }

        let mut list = self.clone();
        list.slice_mut(start, end);
        list
    }

    /// Returns a new list holding the elements for which the predicate
    /// returns `true`, in their original order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=3).collect();
    /// let kept = list.filter(|value| *value > 1);
    /// assert_eq!(kept.len(), 2);
    /// assert_eq!(kept.get(0), &2);
    /// ```
    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let mut builder = ListBuilder::new();
        for value in self.iter() {
            if predicate(value) {
                builder.append(value.clone());
            }
        }
        builder.list()
    }

    /// Returns a new list with the transform applied to every element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=3).collect();
    /// let doubled = list.map(|value| value * 2);
    /// assert_eq!(doubled.get(2), &6);
    /// ```
    #[must_use]
    pub fn map<U: Clone>(&self, mut transform: impl FnMut(&T) -> U) -> List<U> {
        let mut builder = ListBuilder::new();
        for value in self.iter() {
            builder.append(transform(value));
        }
        builder.list()
    }

    /// Calls the action once per element, front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutars::List;
    ///
    /// let list: List<i32> = (1..=3).collect();
    /// let mut sum = 0;
    /// list.each(|value| sum += value);
    /// assert_eq!(sum, 6);
    /// ```
    pub fn each(&self, mut action: impl FnMut(&T)) {
        for value in self.iter() {
            action(value);
        }
    }

    // -------------------------------------------------------------------------
    // Engine: in-place variants shared by persistent wrappers and the builder
    // -------------------------------------------------------------------------

    /// Appends in place. Nodes uniquely owned are edited directly; shared
    /// nodes are copied first.
    fn append_mut(&mut self, value: T) {
        if self.root.is_none() {
            let mut leaf = ListLeafNode::new();
            leaf.set_element(0, Some(value));
            self.root = Some(ReferenceCounter::new(ListNode::Leaf(leaf)));
            self.origin = 0;
            self.height = 0;
            self.size = 1;
            return;
        }

        while self.origin + self.size >= self.capacity() {
            self.grow_right();
        }

        let position = self.origin + self.size;
        let height = self.height;
        if let Some(root) = self.root.as_mut() {
            Self::write_path(root, height, position, value);
        }
        self.size += 1;
    }

    /// Prepends in place, growing a level on the left when the origin
    /// reaches the edge of the physical index space.
    fn prepend_mut(&mut self, value: T) {
        if self.size == 0 {
            self.append_mut(value);
            return;
        }

        if self.origin == 0 {
            self.grow_left();
        }

        self.origin -= 1;
        let position = self.origin;
        let height = self.height;
        if let Some(root) = self.root.as_mut() {
            Self::write_path(root, height, position, value);
        }
        self.size += 1;
    }

    /// Replaces the element at the given logical index in place.
    fn set_mut(&mut self, index: usize, value: T) {
        let position = self.origin + index;
        let height = self.height;
        if let Some(root) = self.root.as_mut() {
            Self::write_path(root, height, position, value);
        }
    }

    /// Contracts to `[start, end)` in place, clearing boundary slots.
    fn slice_mut(&mut self, start: usize, end: usize) {
        let low = self.origin + start;
        let high = self.origin + end - 1;
        let height = self.height;
        if let Some(root) = self.root.as_mut() {
            Self::trim(root, height, Some(low), Some(high));
        }
        self.origin = low;
        self.size = end - start;
    }

    /// Adds a level on the right: the old root becomes child 0.
    fn grow_right(&mut self) {
        let old_root = self.root.take();
        let mut branch = ListBranchNode::new();
        branch.set_child(0, old_root);
        self.root = Some(ReferenceCounter::new(ListNode::Branch(branch)));
        self.height += 1;
    }

    /// Adds a level on the left: the old root becomes child 1 and the
    /// origin shifts past the empty child-0 subtree.
    fn grow_left(&mut self) {
        let child_capacity = self.capacity();
        let old_root = self.root.take();
        let mut branch = ListBranchNode::new();
        branch.set_child(1, old_root);
        self.root = Some(ReferenceCounter::new(ListNode::Branch(branch)));
        self.origin += child_capacity;
        self.height += 1;
    }

    /// Writes `value` at physical `position`, creating any missing nodes
    /// along the path. Shared nodes on the path are copied.
    fn write_path(
        node: &mut ReferenceCounter<ListNode<T>>,
        level: usize,
        position: usize,
        value: T,
    ) {
        match ReferenceCounter::make_mut(node) {
            ListNode::Branch(branch) if level > 0 => {
                let slot = (position >> (level * NODE_BITS)) & NODE_MASK;
                if branch.children[slot].is_none() {
                    let child = if level == 1 {
                        ListNode::Leaf(ListLeafNode::new())
                    } else {
                        ListNode::Branch(ListBranchNode::new())
                    };
                    branch.set_child(slot, Some(ReferenceCounter::new(child)));
                }
                if let Some(child) = branch.children[slot].as_mut() {
                    Self::write_path(child, level - 1, position, value);
                }
            }
            ListNode::Leaf(leaf) => {
                leaf.set_element(position & NODE_MASK, Some(value));
            }
            // A branch at leaf level does not occur in a well-formed trie.
            ListNode::Branch(_) => {}
        }
    }

    /// Keeps only the physical range `[low, high]` reachable from this
    /// node, sharing interior children and cloning the boundary spines.
    /// `low`/`high` are `None` on paths that only carry the other bound.
    fn trim(
        node: &mut ReferenceCounter<ListNode<T>>,
        level: usize,
        low: Option<usize>,
        high: Option<usize>,
    ) {
        match ReferenceCounter::make_mut(node) {
            ListNode::Branch(branch) if level > 0 => {
                let shift = level * NODE_BITS;
                let low_slot = low.map_or(0, |position| (position >> shift) & NODE_MASK);
                let high_slot =
                    high.map_or(NODE_SIZE - 1, |position| (position >> shift) & NODE_MASK);
                for slot in 0..NODE_SIZE {
                    if slot < low_slot || slot > high_slot {
                        branch.set_child(slot, None);
                    }
                }
                if low_slot == high_slot {
                    if let Some(child) = branch.children[low_slot].as_mut() {
                        Self::trim(child, level - 1, low, high);
                    }
                } else {
                    if low.is_some() {
                        if let Some(child) = branch.children[low_slot].as_mut() {
                            Self::trim(child, level - 1, low, None);
                        }
                    }
                    if high.is_some() {
                        if let Some(child) = branch.children[high_slot].as_mut() {
                            Self::trim(child, level - 1, None, high);
                        }
                    }
                }
            }
            ListNode::Leaf(leaf) => {
                let low_slot = low.map_or(0, |position| position & NODE_MASK);
                let high_slot = high.map_or(NODE_SIZE - 1, |position| position & NODE_MASK);
                for slot in 0..NODE_SIZE {
                    if slot < low_slot || slot > high_slot {
                        leaf.set_element(slot, None);
                    }
                }
            }
            ListNode::Branch(_) => {}
        }
    }

    /// Counts element references held by leaves reachable from the root.
    ///
    /// Used by tests to check that slicing releases references.
    #[cfg(test)]
    fn occupied_slots(&self) -> usize {
        fn count<T>(node: &ListNode<T>) -> usize {
            match node {
                ListNode::Branch(branch) => branch
                    .children
                    .iter()
                    .flatten()
                    .map(|child| count(child))
                    .sum(),
                ListNode::Leaf(leaf) => leaf.occupied.count_ones() as usize,
            }
        }
        self.root.as_deref().map_or(0, |root| count(root))
    }
}

// =============================================================================
// Engine Iterator
// =============================================================================

/// A seekable, bidirectional iterator over a [`List`].
///
/// The iterator keeps a bounded stack of trie positions; moving within a
/// leaf is O(1) and crossing a leaf boundary is O(log32 N).
///
/// # Examples
///
/// ```rust
/// use immutars::List;
///
/// let list: List<i32> = (0..5).collect();
/// let mut iterator = list.iterator();
/// iterator.last();
/// assert_eq!(iterator.prev(), Some((4, &4)));
/// assert_eq!(iterator.prev(), Some((3, &3)));
/// ```
pub struct ListIterator<'a, T> {
    list: &'a List<T>,
    /// Logical index of the element the iterator currently points at.
    index: usize,
    /// Set once `prev` walks off the front of the list.
    exhausted: bool,
    stack: [Option<(&'a ListNode<T>, usize)>; MAX_ITERATOR_DEPTH],
    depth: usize,
}

impl<'a, T> ListIterator<'a, T> {
    /// Returns `true` if no more elements remain in the direction of
    /// travel.
    #[must_use]
    pub fn done(&self) -> bool {
        self.exhausted || self.index >= self.list.size
    }

    /// Positions the iterator at the first element.
    pub fn first(&mut self) {
        self.index = 0;
        self.exhausted = false;
        if self.list.size > 0 {
            self.seek_path(self.list.origin);
        }
    }

    /// Positions the iterator at the last element.
    pub fn last(&mut self) {
        self.exhausted = false;
        if self.list.size > 0 {
            self.index = self.list.size - 1;
            self.seek_path(self.list.origin + self.index);
        } else {
            self.index = 0;
        }
    }

    /// Positions the iterator at the given index.
    ///
    /// # Panics
    ///
    /// Panics with `immutable.ListIterator.Seek: index <i> out of bounds`
    /// when the index is not less than the list length.
    pub fn seek(&mut self, index: usize) {
        assert!(
            index < self.list.size,
            "immutable.ListIterator.Seek: index {index} out of bounds"
        );
        self.index = index;
        self.exhausted = false;
        self.seek_path(self.list.origin + index);
    }

    /// Returns the current index/element pair and moves forward.
    ///
    /// Returns `None` once iteration is done; further calls keep
    /// returning `None`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(usize, &'a T)> {
        if self.done() {
            return None;
        }

        let index = self.index;
        let value = self.current()?;

        self.index += 1;
        if self.index < self.list.size {
            let position = self.list.origin + self.index;
            if position & NODE_MASK == 0 {
                self.seek_path(position);
            } else if let Some((node, _)) = self.stack[self.depth] {
                self.stack[self.depth] = Some((node, position & NODE_MASK));
            }
        }

        Some((index, value))
    }

    /// Returns the current index/element pair and moves backward.
    ///
    /// Returns `None` once iteration is done; further calls keep
    /// returning `None`.
    pub fn prev(&mut self) -> Option<(usize, &'a T)> {
        if self.done() {
            return None;
        }

        let index = self.index;
        let value = self.current()?;

        if index == 0 {
            self.exhausted = true;
        } else {
            let old_position = self.list.origin + index;
            self.index -= 1;
            if old_position & NODE_MASK == 0 {
                self.seek_path(old_position - 1);
            } else if let Some((node, _)) = self.stack[self.depth] {
                self.stack[self.depth] = Some((node, (old_position - 1) & NODE_MASK));
            }
        }

        Some((index, value))
    }

    /// Reads the element under the current stack position.
    fn current(&self) -> Option<&'a T> {
        let (node, slot) = self.stack[self.depth]?;
        match node {
            ListNode::Leaf(leaf) => leaf.elements[slot].as_ref(),
            ListNode::Branch(_) => None,
        }
    }

    /// Rebuilds the stack to point at the given physical position.
    fn seek_path(&mut self, position: usize) {
        let Some(mut node) = self.list.root.as_deref() else {
            return;
        };
        let mut level = self.list.height;
        let mut depth = 0;

        loop {
            let slot = if level > 0 {
                (position >> (level * NODE_BITS)) & NODE_MASK
            } else {
                position & NODE_MASK
            };
            self.stack[depth] = Some((node, slot));

            match node {
                ListNode::Branch(branch) if level > 0 => {
                    let Some(child) = branch.children[slot].as_deref() else {
                        self.depth = depth;
                        return;
                    };
                    node = child;
                    level -= 1;
                    depth += 1;
                }
                _ => {
                    self.depth = depth;
                    return;
                }
            }
        }
    }
}

/// A plain front-to-back iterator over references to list elements.
pub struct ListIter<'a, T> {
    iterator: ListIterator<'a, T>,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.iterator.done() {
            0
        } else {
            self.iterator.list.size - self.iterator.index
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

/// An owning iterator over list elements.
pub struct ListIntoIter<T> {
    list: List<T>,
    index: usize,
}

impl<T: Clone> Iterator for ListIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.list.size {
            return None;
        }
        let value = self.list.lookup(self.index).cloned();
        self.index += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.size.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ListIntoIter<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut builder = ListBuilder::new();
        for value in iter {
            builder.append(value);
        }
        builder.list()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = ListIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = ListIntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        ListIntoIter {
            list: self,
            index: 0,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An efficient builder for [`List`] values.
///
/// The builder owns its nodes exclusively, so repeated updates edit them
/// in place instead of copying a path per operation. Publishing with
/// [`list`](Self::list) freezes the value; any use after publishing is a
/// programmer error and panics.
///
/// # Examples
///
/// ```rust
/// use immutars::ListBuilder;
///
/// let mut builder = ListBuilder::new();
/// for value in 0..100 {
///     builder.append(value);
/// }
/// let list = builder.list();
/// assert_eq!(list.len(), 100);
/// assert_eq!(list.get(42), &42);
/// ```
pub struct ListBuilder<T> {
    list: Option<List<T>>,
}

impl<T: Clone> ListBuilder<T> {
    /// Creates a builder starting from an empty list.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            list: Some(List::new()),
        }
    }

    /// Creates a builder starting from an existing list.
    ///
    /// The source list is unaffected by any subsequent builder updates.
    #[inline]
    #[must_use]
    pub const fn from_list(list: List<T>) -> Self {
        Self { list: Some(list) }
    }

    /// Publishes and returns the built list.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn list(&mut self) -> List<T> {
        self.list
            .take()
            .expect("immutable.ListBuilder.List(): duplicate call to fetch list")
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

    /// Returns a reference to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-bounds index or a published builder.
    #[must_use]
    pub fn get(&self, index: usize) -> &T {
        self.target().get(index)
    }

    /// Appends an element at the end.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn append(&mut self, value: T) {
        self.target_mut().append_mut(value);
    }

    /// Inserts an element at the front.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    pub fn prepend(&mut self, value: T) {
        self.target_mut().prepend_mut(value);
    }

    /// Replaces the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-bounds index or a published builder.
    pub fn set(&mut self, index: usize, value: T) {
        let target = self.target_mut();
        assert!(
            index < target.len(),
            "immutable.List.Set: index {index} out of bounds"
        );
        target.set_mut(index, value);
    }

    /// Contracts the list to `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics on invalid slice bounds or a published builder.
    pub fn slice(&mut self, start: usize, end: usize) {
        let target = self.target_mut();
        assert!(
            start <= target.len(),
            "immutable.List.Slice: start index {start} out of bounds"
        );
        assert!(
            end <= target.len(),
            "immutable.List.Slice: end index {end} out of bounds"
        );
        assert!(
            start <= end,
            "immutable.List.Slice: invalid slice index: [{start}:{end}]"
        );
        if start == end {
            *target = List::new();
        } else if !(start == 0 && end == target.len()) {
            target.slice_mut(start, end);
        }
    }

    /// Returns an engine iterator over the current contents.
    ///
    /// # Panics
    ///
    /// Panics when the builder has already published.
    #[must_use]
    pub fn iterator(&self) -> ListIterator<'_, T> {
        self.target().iterator()
    }

    fn target(&self) -> &List<T> {
        self.list
            .as_ref()
            .expect("immutable.ListBuilder: builder invalid after List() invocation")
    }

    fn target_mut(&mut self) -> &mut List<T> {
        self.list
            .as_mut()
            .expect("immutable.ListBuilder: builder invalid after List() invocation")
    }
}

impl<T: Clone> Default for ListBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

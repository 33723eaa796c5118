//! Integration tests for `List`.

use std::rc::Rc;

use immutars::{List, ListBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

#[rstest]
fn test_empty_list() {
    let list: List<&str> = List::new();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert!(list.iterator().done());
}

#[rstest]
fn test_append_and_read_back() {
    let list = List::new().append("foo").append("bar").append("baz");
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0), &"foo");
    assert_eq!(list.get(1), &"bar");
    assert_eq!(list.get(2), &"baz");

    let updated = list.set(1, "qux");
    assert_eq!(updated.get(1), &"qux");
    assert_eq!(updated.get(0), &"foo");
    assert_eq!(updated.get(2), &"baz");

    let sliced = updated.slice(1, 3);
    assert_eq!(sliced.len(), 2);
    assert_eq!(sliced.get(0), &"qux");
    assert_eq!(sliced.get(1), &"baz");
}

#[rstest]
fn test_append_preserves_earlier_version() {
    let list = List::new().append("foo");
    let other = list.append("bar");
    assert_eq!(other.get(0), &"foo");
    assert_eq!(other.get(1), &"bar");
    assert_eq!(list.len(), 1);
}

#[rstest]
fn test_prepend_reverses_arrival_order() {
    let list = List::new().prepend("foo").prepend("bar").prepend("baz");
    assert_eq!(list.get(0), &"baz");
    assert_eq!(list.get(1), &"bar");
    assert_eq!(list.get(2), &"foo");
}

#[rstest]
fn test_deep_list_round_trip() {
    let mut list = List::new();
    let mut reference = Vec::new();
    for value in 0..100_000 {
        list = list.append(value);
        reference.push(value);
    }

    assert_eq!(list.len(), reference.len());
    for (index, expected) in reference.iter().enumerate() {
        assert_eq!(list.get(index), expected);
    }
}

#[rstest]
#[should_panic(expected = "immutable.List.Get: index 1 out of bounds")]
fn test_get_above_range() {
    let list = List::new().append("foo");
    list.get(1);
}

#[rstest]
#[should_panic(expected = "immutable.List.Set: index 1 out of bounds")]
fn test_set_out_of_range() {
    let list = List::new().append("foo");
    let _ = list.set(1, "bar");
}

#[rstest]
#[should_panic(expected = "immutable.List.Slice: start index 2 out of bounds")]
fn test_slice_start_out_of_range() {
    let list = List::new().append("foo");
    let _ = list.slice(2, 3);
}

#[rstest]
#[should_panic(expected = "immutable.List.Slice: end index 3 out of bounds")]
fn test_slice_end_out_of_range() {
    let list = List::new().append("foo");
    let _ = list.slice(1, 3);
}

#[rstest]
#[should_panic(expected = "immutable.List.Slice: invalid slice index: [2:1]")]
fn test_slice_invalid_range() {
    let list = List::new().append("foo").append("bar");
    let _ = list.slice(2, 1);
}

#[rstest]
fn test_slice_beginning() {
    let list = List::new().append("foo").append("bar");
    let sliced = list.slice(1, 2);
    assert_eq!(sliced.len(), 1);
    assert_eq!(sliced.get(0), &"bar");
}

#[rstest]
#[should_panic(expected = "immutable.ListIterator.Seek: index 1 out of bounds")]
fn test_iterator_seek_out_of_bounds() {
    let list = List::new().append("foo");
    list.iterator().seek(1);
}

#[rstest]
fn test_slice_releases_references() {
    let values: Vec<Rc<i32>> = (0..5).map(Rc::new).collect();
    let list: List<Rc<i32>> = values.iter().cloned().collect();
    let sliced = list.slice(2, 4);
    drop(list);

    // Only the two live slots still hold a reference besides ours.
    for (index, value) in values.iter().enumerate() {
        let expected = if (2..4).contains(&index) { 2 } else { 1 };
        assert_eq!(Rc::strong_count(value), expected, "slot {index}");
    }

    assert_eq!(*sliced.get(0).as_ref(), 2);
    assert_eq!(*sliced.get(1).as_ref(), 3);
}

#[rstest]
fn test_iterator_forward_emits_index_value_pairs() {
    let list = List::new().append("foo").append("bar").append("baz");
    let mut iterator = list.iterator();
    let mut collected = Vec::new();
    while let Some((index, value)) = iterator.next() {
        collected.push((index, *value));
    }
    assert_eq!(collected, vec![(0, "foo"), (1, "bar"), (2, "baz")]);
    assert_eq!(iterator.next(), None);
}

#[rstest]
fn test_iterator_reverse_emits_index_value_pairs() {
    let list = List::new().append("foo").append("bar").append("baz");
    let mut iterator = list.iterator();
    iterator.last();
    let mut collected = Vec::new();
    while let Some((index, value)) = iterator.prev() {
        collected.push((index, *value));
    }
    assert_eq!(collected, vec![(2, "baz"), (1, "bar"), (0, "foo")]);
    assert_eq!(iterator.prev(), None);
}

/// Mirrors a `List` against a `Vec` through a random mix of operations
/// and verifies that every observation matches.
struct ListMirror {
    list: List<i32>,
    reference: Vec<i32>,
}

impl ListMirror {
    fn new() -> Self {
        Self {
            list: List::new(),
            reference: Vec::new(),
        }
    }

    fn verify(&self) {
        assert_eq!(self.list.len(), self.reference.len());
        for (index, expected) in self.reference.iter().enumerate() {
            assert_eq!(self.list.get(index), expected);
        }

        let mut iterator = self.list.iterator();
        for (index, expected) in self.reference.iter().enumerate() {
            assert_eq!(iterator.next(), Some((index, expected)));
        }
        assert_eq!(iterator.next(), None);

        iterator.last();
        for (index, expected) in self.reference.iter().enumerate().rev() {
            assert_eq!(iterator.prev(), Some((index, expected)));
        }
        assert_eq!(iterator.prev(), None);
    }
}

#[rstest]
fn test_random_operations_match_vec() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut mirror = ListMirror::new();

    for step in 0..5_000 {
        let roll = rng.random_range(0..70);
        match roll {
            0 => {
                if !mirror.reference.is_empty() {
                    let start = rng.random_range(0..mirror.reference.len());
                    let end = rng.random_range(start..mirror.reference.len());
                    mirror.list = mirror.list.slice(start, end);
                    mirror.reference.drain(end..);
                    mirror.reference.drain(..start);
                }
            }
            1..10 => {
                if !mirror.reference.is_empty() {
                    let index = rng.random_range(0..mirror.reference.len());
                    let value = rng.random_range(0..10_000);
                    mirror.list = mirror.list.set(index, value);
                    mirror.reference[index] = value;
                }
            }
            10..30 => {
                let value = rng.random_range(0..10_000);
                mirror.list = mirror.list.prepend(value);
                mirror.reference.insert(0, value);
            }
            _ => {
                let value = rng.random_range(0..10_000);
                mirror.list = mirror.list.append(value);
                mirror.reference.push(value);
            }
        }

        if step % 500 == 0 {
            mirror.verify();
        }
    }
    mirror.verify();
}

#[rstest]
fn test_builder_produces_equivalent_list() {
    let mut rng = StdRng::seed_from_u64(0xb01d);
    let operations: Vec<(u8, i32)> = (0..2_000)
        .map(|_| (rng.random_range(0..3), rng.random_range(0..1_000)))
        .collect();

    let mut persistent = List::new();
    let mut builder = ListBuilder::new();
    for (kind, value) in &operations {
        match kind {
            0 => {
                persistent = persistent.prepend(*value);
                builder.prepend(*value);
            }
            1 if !persistent.is_empty() => {
                let index = (*value as usize) % persistent.len();
                persistent = persistent.set(index, *value);
                builder.set(index, *value);
            }
            _ => {
                persistent = persistent.append(*value);
                builder.append(*value);
            }
        }
    }

    let built = builder.list();
    assert_eq!(built.len(), persistent.len());
    let built_values: Vec<i32> = built.iter().copied().collect();
    let persistent_values: Vec<i32> = persistent.iter().copied().collect();
    assert_eq!(built_values, persistent_values);
}

#[rstest]
fn test_builder_slice_and_iterator() {
    let mut builder = ListBuilder::new();
    for value in 0..100 {
        builder.append(value);
    }
    builder.slice(10, 90);
    assert_eq!(builder.len(), 80);
    assert_eq!(builder.get(0), &10);

    let mut iterator = builder.iterator();
    assert_eq!(iterator.next(), Some((0, &10)));

    let list = builder.list();
    assert_eq!(list.len(), 80);
    assert_eq!(list.get(79), &89);
}

//! Integration tests for `SortedMap`.

use std::cmp::Ordering;

use immutars::{Comparer, SortedMap, SortedMapBuilder};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rstest::rstest;

fn fruit_map() -> SortedMap<String, i32> {
    [
        ("strawberry", 900),
        ("kiwi", 300),
        ("apple", 100),
        ("pear", 700),
        ("pineapple", 800),
        ("peach", 600),
        ("orange", 500),
        ("grape", 200),
        ("mango", 400),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

#[rstest]
fn test_empty_map() {
    let map: SortedMap<String, i32> = SortedMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.get(&"anything".to_string()), None);
    assert!(map.iterator().done());
}

#[rstest]
fn test_fruit_iterates_alphabetically() {
    let map = fruit_map();
    let pairs: Vec<(String, i32)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(
        pairs,
        vec![
            ("apple".to_string(), 100),
            ("grape".to_string(), 200),
            ("kiwi".to_string(), 300),
            ("mango".to_string(), 400),
            ("orange".to_string(), 500),
            ("peach".to_string(), 600),
            ("pear".to_string(), 700),
            ("pineapple".to_string(), 800),
            ("strawberry".to_string(), 900),
        ]
    );
}

#[rstest]
fn test_fruit_iterates_reverse_alphabetically() {
    let map = fruit_map();
    let mut iterator = map.iterator();
    iterator.last();
    let mut keys = Vec::new();
    while let Some((key, _)) = iterator.prev() {
        keys.push(key.clone());
    }
    assert_eq!(
        keys,
        vec![
            "strawberry",
            "pineapple",
            "pear",
            "peach",
            "orange",
            "mango",
            "kiwi",
            "grape",
            "apple"
        ]
    );
}

#[rstest]
fn test_seek_lands_on_first_key_not_less() {
    // Keys "0000", "0002", ..., "0098".
    let mut map = SortedMap::new();
    for value in (0..100).step_by(2) {
        map = map.set(format!("{value:04}"), value);
    }

    let mut iterator = map.iterator();
    iterator.seek(&"0051".to_string());
    let (key, _) = iterator.next().expect("key at or after 0051");
    assert_eq!(key, "0052");

    iterator.seek(&String::new());
    let mut seen = Vec::new();
    while let Some((key, _)) = iterator.next() {
        seen.push(key.clone());
    }
    let expected: Vec<String> = (0..100).step_by(2).map(|value| format!("{value:04}")).collect();
    assert_eq!(seen, expected);

    iterator.seek(&"1000".to_string());
    assert!(iterator.done());
    assert_eq!(iterator.next(), None);
}

#[rstest]
fn test_overwrite_keeps_size_and_order() {
    let mut map = SortedMap::new();
    for key in 0..1_000 {
        map = map.set(key, key);
    }
    for key in 0..1_000 {
        map = map.set(key, key * 2);
    }

    assert_eq!(map.len(), 1_000);
    for key in 0..1_000 {
        assert_eq!(map.get(&key), Some(&(key * 2)));
    }
}

#[rstest]
fn test_shuffled_inserts_come_out_sorted() {
    let mut keys: Vec<i32> = (0..10_000).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(0x0dd5));

    let mut builder = SortedMapBuilder::new();
    for key in &keys {
        builder.set(*key, *key);
    }
    let map = builder.sorted_map();

    assert_eq!(map.len(), 10_000);
    let emitted: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
    assert_eq!(emitted, (0..10_000).collect::<Vec<i32>>());
}

#[rstest]
fn test_delete_keeps_remaining_order() {
    let mut map = SortedMap::new();
    for key in 0..2_000 {
        map = map.set(key, key);
    }
    for key in (0..2_000).step_by(2) {
        map = map.delete(&key);
    }

    assert_eq!(map.len(), 1_000);
    let emitted: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
    let expected: Vec<i32> = (0..2_000).filter(|key| key % 2 == 1).collect();
    assert_eq!(emitted, expected);
}

#[rstest]
fn test_delete_absent_and_on_empty() {
    let empty: SortedMap<i32, i32> = SortedMap::new();
    let still_empty = empty.delete(&7);
    assert_eq!(still_empty.len(), 0);

    let map = SortedMap::new().set(1, 1);
    let same = map.delete(&2);
    assert_eq!(same.len(), 1);
    assert_eq!(same.get(&1), Some(&1));
}

#[rstest]
fn test_custom_comparer_defines_the_order() {
    #[derive(Clone, Copy, Default)]
    struct Reverse;

    impl Comparer<i32> for Reverse {
        fn compare(&self, a: &i32, b: &i32) -> Ordering {
            b.cmp(a)
        }
    }

    let mut map = SortedMap::with_comparer(Reverse);
    for key in 0..100 {
        map = map.set(key, key);
    }

    let emitted: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
    assert_eq!(emitted, (0..100).rev().collect::<Vec<i32>>());

    let mut iterator = map.iterator();
    iterator.seek(&50);
    assert_eq!(iterator.next(), Some((&50, &50)));
    assert_eq!(iterator.next(), Some((&49, &49)));
}

#[rstest]
fn test_builder_equivalent_to_persistent_operations() {
    let mut keys: Vec<i32> = (0..5_000).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(0xfeed));

    let mut persistent = SortedMap::new();
    let mut builder = SortedMapBuilder::new();
    for key in &keys {
        persistent = persistent.set(*key, *key);
        builder.set(*key, *key);
    }
    for key in keys.iter().filter(|key| *key % 3 == 0) {
        persistent = persistent.delete(key);
        builder.delete(key);
    }

    let built = builder.sorted_map();
    assert_eq!(built.len(), persistent.len());
    let built_pairs: Vec<(i32, i32)> = built.iter().map(|(k, v)| (*k, *v)).collect();
    let persistent_pairs: Vec<(i32, i32)> = persistent.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(built_pairs, persistent_pairs);
}

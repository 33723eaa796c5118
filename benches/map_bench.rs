//! Benchmark for Map vs standard HashMap.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use immutars::{Map, MapBuilder};
use std::collections::HashMap;
use std::hint::black_box;

// =============================================================================
// set Benchmark
// =============================================================================

fn benchmark_set(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set");

    for size in [100u64, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("Map", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = Map::new();
                for key in 0..size {
                    map = map.set(black_box(key), key);
                }
                black_box(map)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("MapBuilder", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut builder = MapBuilder::new();
                    for key in 0..size {
                        builder.set(black_box(key), key);
                    }
                    black_box(builder.map())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = HashMap::new();
                    for key in 0..size {
                        map.insert(black_box(key), key);
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100u64, 1000, 10000] {
        let map: Map<u64, u64> = (0..size).map(|key| (key, key)).collect();
        let reference: HashMap<u64, u64> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("Map", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut hits = 0u64;
                for key in 0..size {
                    if map.get(black_box(&key)).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut hits = 0u64;
                    for key in 0..size {
                        if reference.get(black_box(&key)).is_some() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");

    for size in [100u64, 1000, 10000] {
        let map: Map<u64, u64> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("Map", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut current = map.clone();
                for key in 0..size {
                    current = current.delete(black_box(&key));
                }
                black_box(current)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_set, benchmark_get, benchmark_delete);
criterion_main!(benches);

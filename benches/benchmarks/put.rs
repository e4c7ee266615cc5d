use criterion::{criterion_group, BenchmarkId, Criterion};

use crate::benchmarks::common::{prefill, stores, SIZES};

/// Writes fresh keys into a full store, so every cache write evicts.
pub fn put_fresh(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("put");
    for size in SIZES {
        for store in stores(size) {
            prefill(store.as_ref(), size);

            let mut index = size;
            group.bench_with_input(BenchmarkId::new(store.name(), size), &size, |bencher, _| {
                bencher.iter(|| {
                    let key = index.to_string();
                    store.put(key.clone(), key);
                    index += 1;
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, put_fresh);

use criterion::{black_box, criterion_group, BenchmarkId, Criterion};

use crate::benchmarks::common::{prefill, stores, SIZES};

/// Reads keys that are all resident, cycling through `0..size`.
pub fn get_resident(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");
    for size in SIZES {
        let keys: Vec<String> = (0..size).map(|index| index.to_string()).collect();

        for store in stores(size) {
            prefill(store.as_ref(), size);

            let mut index = 0;
            group.bench_with_input(BenchmarkId::new(store.name(), size), &size, |bencher, &size| {
                bencher.iter(|| {
                    let value = store.get(&keys[index % size]);
                    index += 1;
                    black_box(value)
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, get_resident);

use criterion::{black_box, criterion_group, BenchmarkId, Criterion};

use crate::benchmarks::common::{distribution, stores};

const CAPACITY: usize = 2 << 12;

/// Keys are drawn from twice the capacity, so roughly half the reads miss.
const KEY_SPACE: usize = CAPACITY * 2;

const SAMPLES: usize = 2 << 15;
const MASK: usize = SAMPLES - 1;

/// Alternates a put and a get over uniformly random keys.
pub fn put_get_random(criterion: &mut Criterion) {
    let distribution = distribution(KEY_SPACE, SAMPLES);

    let mut group = criterion.benchmark_group("put_get");
    for store in stores(CAPACITY) {
        let mut index = 0;
        group.bench_function(BenchmarkId::new(store.name(), CAPACITY), |bencher| {
            bencher.iter(|| {
                let key = &distribution[index & MASK];
                store.put(key.clone(), key.clone());
                let value = store.get(&distribution[(index + 1) & MASK]);
                index += 2;
                black_box(value)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, put_get_random);

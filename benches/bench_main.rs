use criterion::criterion_main;

mod benchmarks;

criterion_main! {
    benchmarks::get::benches,
    benchmarks::put::benches,
    benchmarks::put_get::benches,
}

//! Benchmarks for the ecosystem tick

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ecosim::Ecosystem;

fn benchmark_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecosystem_update");

    for scale in [1usize, 4, 8].iter() {
        let mut eco = Ecosystem::with_seed(1200.0, 600.0, 500, 42);
        eco.initialize(20 * scale, 5 * scale, 30 * scale);
        eco.spawn_food(50 * scale);

        group.bench_with_input(BenchmarkId::new("population", 55 * scale), scale, |b, _| {
            b.iter(|| eco.update(1.0 / 60.0));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_update);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::SVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use manifold::core::{compute_convex_hull, compute_delaunay};
use manifold::progress::Progress;

fn random_points<const N: usize>(count: usize, seed: u64) -> Vec<SVector<f32, N>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| SVector::from_fn(|_, _| rng.gen_range(-1.0f32..1.0)))
        .collect()
}

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_hull_3d");
    for count in [1_000usize, 10_000] {
        let points = random_points::<3>(count, 1);
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| {
                let progress = Progress::new();
                compute_convex_hull::<3>(points, &progress).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_delaunay(c: &mut Criterion) {
    let points = random_points::<3>(2_000, 2);
    c.bench_function("delaunay_3d_2000", |b| {
        b.iter(|| {
            let progress = Progress::new();
            compute_delaunay::<3, 4>(&points, &progress).unwrap()
        });
    });
}

criterion_group!(benches, bench_hull, bench_delaunay);
criterion_main!(benches);

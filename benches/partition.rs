use criterion::{criterion_group, criterion_main, Criterion, black_box};

use worldtree::core::DVec3;
use worldtree::export::flatten;
use worldtree::markers::{grid_markers, SamplingConfig};
use worldtree::math::Region;
use worldtree::partition::{collect_bounds, PartitionBuilder, TreeConfig};

/// Clumps of markers on a `side` x `side` level with empty space between.
fn clustered_level(side: f64, clumps: usize, per_clump: usize) -> Vec<DVec3> {
    let mut markers = Vec::with_capacity(clumps * per_clump);
    for c in 0..clumps {
        let cf = c as f64;
        let cx = (cf * 0.618).fract() * side;
        let cy = (cf * 0.414).fract() * side;
        for i in 0..per_clump {
            let t = i as f64;
            markers.push(DVec3::new(
                cx + (t * 2.3).sin() * 60.0,
                cy + (t * 1.7).cos() * 60.0,
                (t * 0.5).sin() * 10.0,
            ));
        }
    }
    markers
}

fn bench_collect_bounds(c: &mut Criterion) {
    let markers = clustered_level(4000.0, 64, 256);

    c.bench_function("collect_bounds_16k", |b| {
        b.iter(|| collect_bounds(black_box(&markers), 20.0));
    });
}

fn bench_build_clustered(c: &mut Criterion) {
    let markers = clustered_level(4000.0, 64, 256);
    let builder = PartitionBuilder::new(&TreeConfig::default()).unwrap();

    c.bench_function("partition_build_clustered_16k", |b| {
        b.iter(|| builder.build(black_box(&markers)));
    });
}

fn bench_build_dense_grid(c: &mut Criterion) {
    let level = Region::new(DVec3::ZERO, DVec3::new(2000.0, 2000.0, 0.0));
    let markers = grid_markers(&[level], &SamplingConfig::default()).unwrap();
    let builder = PartitionBuilder::new(&TreeConfig::default()).unwrap();

    c.bench_function("partition_build_dense_grid_2km", |b| {
        b.iter(|| builder.build(black_box(&markers)));
    });
}

fn bench_flatten(c: &mut Criterion) {
    let markers = clustered_level(4000.0, 64, 256);
    let tree = PartitionBuilder::new(&TreeConfig::default())
        .unwrap()
        .build(&markers)
        .unwrap();

    c.bench_function("flatten_clustered_16k", |b| {
        b.iter(|| flatten(black_box(&tree)));
    });
}

criterion_group!(
    benches,
    bench_collect_bounds,
    bench_build_clustered,
    bench_build_dense_grid,
    bench_flatten,
);
criterion_main!(benches);

//! Benchmarks for cluster labeling and maximum square detection.
//!
//! Run with: `cargo bench --bench tile_analytics`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tile_explorer::{find_max_squares, label_clusters, TileGrid, TileSet};

/// Solid square of visited tiles with a sparse halo of single visits.
fn explored_region(side: i64) -> TileSet {
    let solid = (0..side).flat_map(move |x| (0..side).map(move |y| (x, y)));
    let halo = (0..side).step_by(3).map(move |x| (x, side + 1 + x % 5));
    TileSet::new(14, solid.chain(halo))
}

fn bench_label_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_clusters");
    for side in [32i64, 128, 512] {
        let tiles = explored_region(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &tiles, |b, tiles| {
            b.iter(|| label_clusters(black_box(tiles)))
        });
    }
    group.finish();
}

fn bench_find_max_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_max_squares");
    for side in [32i64, 128, 512] {
        let grid = TileGrid::from_tile_set(&explored_region(side));
        group.bench_with_input(BenchmarkId::from_parameter(side), &grid, |b, grid| {
            b.iter(|| find_max_squares(black_box(grid)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_label_clusters, bench_find_max_squares);
criterion_main!(benches);

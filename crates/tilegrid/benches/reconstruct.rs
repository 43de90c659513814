mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use tilegrid::grid::TileGrid;
use tilegrid::reconstruct::{build_labels, build_roi_labels, roi_values_to_image, tile_values_to_image};
use tilegrid::reduce::reduce_tiles_labeled;

const GRID_EDGES: [usize; 4] = [8, 32, 128, 512];

fn tile_values_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct/tile_values_to_image");

    for &edge in &GRID_EDGES {
        let values = Array2::from_shape_fn((edge, edge), |(r, c)| (r * edge + c) as f64);
        let labels = build_labels(&values);
        group.throughput(common::elements_throughput(labels.len()));
        group.bench_with_input(BenchmarkId::from_parameter(edge), &edge, |b, _| {
            b.iter(|| {
                let image = tile_values_to_image(
                    labels.iter().map(|(k, v)| (k, *v)),
                    (edge, edge),
                )
                .expect("labels are valid");
                black_box(image);
            });
        });
    }

    group.finish();
}

fn roi_values_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct/roi_values_to_image");

    for &edge in &GRID_EDGES {
        let values = Array2::from_shape_fn((edge, edge), |(r, c)| ((r + c) % 17) as f64);
        let records = build_roi_labels(&values, (4, 4)).expect("divisible shape");
        group.throughput(common::elements_throughput(records.len()));
        group.bench_with_input(BenchmarkId::from_parameter(edge), &edge, |b, _| {
            b.iter(|| {
                let image = roi_values_to_image(
                    records.iter().map(|(t, r, v)| (t, r, *v)),
                    (edge / 4, edge / 4),
                    (4, 4),
                    Some(3.0),
                )
                .expect("labels are valid");
                black_box(image);
            });
        });
    }

    group.finish();
}

fn reduce_benches(c: &mut Criterion) {
    let image = common::banded_image(2048);
    let grid = TileGrid::new(&[2048, 2048], &[64, 64], None).expect("valid grid");
    let mut group = c.benchmark_group("reduce/mean_to_image");
    group.throughput(common::elements_throughput(grid.tile_count()));

    group.bench_function("64", |b| {
        b.iter(|| {
            let means = reduce_tiles_labeled(&image, &grid, |t| {
                t.iter().map(|&v| v as f64).sum::<f64>() / t.len() as f64
            })
            .expect("grid matches image");
            let coarse = tile_values_to_image(means, (32, 32)).expect("labels are valid");
            black_box(coarse);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = tile_values_benches, roi_values_benches, reduce_benches
}
criterion_main!(benches);

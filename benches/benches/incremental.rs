// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_ink::{Stroke, StrokeCollection, StylusShape, stylus_points_from};
use understory_ink_hit::{IncrementalLassoHitTester, IncrementalStrokeHitTester};

fn grid(side: usize) -> StrokeCollection {
    let strokes = (0..side * side).map(|k| {
        let (x, y) = ((k % side) as f64 * 20.0, (k / side) as f64 * 20.0);
        Stroke::new(stylus_points_from((0..8).map(|i| (x + f64::from(i) * 2.0, y + 5.0)))).unwrap()
    });
    StrokeCollection::from_strokes(strokes.collect()).unwrap()
}

/// A circle around the grid, sampled like pointer input.
fn loop_path(side: usize, samples: u32) -> Vec<Point> {
    let radius = side as f64 * 10.0;
    (0..samples)
        .map(|k| {
            let angle = core::f64::consts::TAU * f64::from(k) / f64::from(samples);
            Point::new(radius + radius * angle.cos(), radius + radius * angle.sin())
        })
        .collect()
}

fn bench_incremental_lasso(c: &mut Criterion) {
    let mut group = c.benchmark_group("ink_hit/lasso_moves");
    for side in [10usize, 30] {
        let path = loop_path(side, 400);
        group.bench_with_input(BenchmarkId::new("incremental", side * side), &path, |b, path| {
            b.iter_batched(
                || grid(side),
                |mut ink| {
                    let mut tester = IncrementalLassoHitTester::new(&mut ink, 80).unwrap();
                    for chunk in path.chunks(4) {
                        black_box(tester.add_points(&ink, chunk.iter().copied()).unwrap());
                    }
                    tester.end_hit_testing(&mut ink).unwrap();
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("one_shot", side * side), &path, |b, path| {
            b.iter_batched(
                || grid(side),
                |ink| {
                    for end in (4..=path.len()).step_by(4) {
                        black_box(ink.hit_test_lasso(&path[..end], 80).unwrap());
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_incremental_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("ink_hit/eraser_moves");
    for side in [10usize, 30] {
        let extent = side as f64 * 20.0;
        let path: Vec<Point> = (0..200)
            .map(|i| {
                let t = f64::from(i) / 199.0;
                Point::new(extent * t, extent * t)
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("sweep", side * side), &path, |b, path| {
            b.iter_batched(
                || grid(side),
                |mut ink| {
                    let mut eraser =
                        IncrementalStrokeHitTester::new(&mut ink, StylusShape::ellipse(4.0, 4.0));
                    for chunk in path.chunks(2) {
                        for event in eraser.add_points(&ink, chunk.iter().copied()).unwrap() {
                            event.apply_point_erase(&mut ink).unwrap();
                        }
                    }
                    black_box(ink.len());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_incremental_lasso, bench_incremental_erase);
criterion_main!(benches);

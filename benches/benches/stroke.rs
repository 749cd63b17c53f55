// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use understory_ink::{
    DEFAULT_FITTING_ERROR, Stroke, StrokeCollection, StylusPoint, StylusShape, fit_points,
};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// A wavy handwriting-like run of `len` samples starting at `origin`.
fn scribble(origin: Point, len: usize, rng: &mut Lcg) -> Vec<StylusPoint> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            let jitter = rng.next_f64() - 0.5;
            StylusPoint::with_pressure(
                origin.x + t * 2.0,
                origin.y + (t * 0.3).sin() * 8.0 + jitter,
                0.3 + 0.4 * rng.next_f64() as f32,
            )
        })
        .collect()
}

fn ink_grid(strokes: usize, len: usize) -> StrokeCollection {
    let mut rng = Lcg::new(7);
    let per_row = 10;
    let collection = (0..strokes).map(|k| {
        let origin = Point::new(
            (k % per_row) as f64 * (len as f64 * 2.0 + 10.0),
            (k / per_row) as f64 * 30.0,
        );
        Stroke::new(scribble(origin, len, &mut rng)).unwrap()
    });
    StrokeCollection::from_strokes(collection.collect()).unwrap()
}

fn bench_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("ink/fit_points");
    let tip = Rect::new(-1.0, -1.0, 1.0, 1.0);
    for len in [16usize, 128, 1_024] {
        let points = scribble(Point::ZERO, len, &mut Lcg::new(1));
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("fit", len), &points, |b, points| {
            b.iter(|| black_box(fit_points(points, DEFAULT_FITTING_ERROR, tip)));
        });
    }
    group.finish();
}

fn bench_hit_tests(c: &mut Criterion) {
    let mut group = c.benchmark_group("ink/collection_hit_test");
    for strokes in [10usize, 100, 1_000] {
        let ink = ink_grid(strokes, 64);
        let Some(bounds) = ink.bounds() else {
            continue;
        };
        let lasso = [
            Point::new(bounds.x0 - 5.0, bounds.y0 - 5.0),
            Point::new(bounds.center().x, bounds.y0 - 5.0),
            Point::new(bounds.center().x, bounds.y1 + 5.0),
            Point::new(bounds.x0 - 5.0, bounds.y1 + 5.0),
        ];
        let eraser_path: Vec<Point> = (0..32)
            .map(|i| {
                let t = f64::from(i) / 31.0;
                Point::new(bounds.x0 + bounds.width() * t, bounds.y0 + bounds.height() * t)
            })
            .collect();
        let eraser = StylusShape::ellipse(6.0, 6.0);
        group.throughput(Throughput::Elements(strokes as u64));

        group.bench_with_input(BenchmarkId::new("lasso", strokes), &ink, |b, ink| {
            b.iter(|| black_box(ink.hit_test_lasso(&lasso, 80).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("eraser_path", strokes), &ink, |b, ink| {
            b.iter(|| black_box(ink.hit_test_path(&eraser_path, &eraser).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("erase_path", strokes), &ink, |b, ink| {
            b.iter_batched(
                || ink.clone(),
                |mut ink| {
                    ink.erase_path(&eraser_path, &eraser).unwrap();
                    black_box(ink);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitting, bench_hit_tests);
criterion_main!(benches);

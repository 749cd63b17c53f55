// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bezier smoothing of captured points.
//!
//! [`fit_points`] fits a piecewise cubic Bezier curve through a stroke's
//! samples within a fitting error, flattens it back into a polyline, and
//! re-samples pressure and auxiliary channels along the new polyline by
//! matching normalized arc length. The fitter never fails outward: when a
//! curve cannot be constructed the input is returned unchanged.
//!
//! The fit itself is the classic recursive least-squares approach: chord
//! length parameterization, a least-squares solve for the two inner control
//! points along fixed end tangents, Newton reparameterization when the error
//! is close, and a split at the worst point otherwise. Sharp turns (cusps)
//! split the input up front so that corners stay corners.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::point::StylusPoint;

/// Lower bound for the flattening tolerance.
///
/// Degenerate (near-zero) tips would otherwise ask for an unbounded number
/// of flattened points.
pub const MIN_FLATTENING_TOLERANCE: f64 = 0.1;

/// Scale from `log10(2 * min tip size)` to a flattening tolerance in stroke units.
pub const FLATTENING_SCALE: f64 = 0.5;

/// Turns sharper than this (cosine of the angle between consecutive
/// directions) are treated as cusps.
const CUSP_COSINE: f64 = -0.5;

/// Newton iterations attempted before splitting a span.
const MAX_REPARAMETERIZE_ITERATIONS: usize = 4;

/// Recursion guard for pathological inputs.
const MAX_FIT_DEPTH: usize = 64;

/// Consecutive samples closer than this are merged before fitting.
const DUPLICATE_DISTANCE: f64 = 1e-9;

/// Flattening tolerance for a tip with the given bounds.
///
/// Computed as `log10(2 * min(width, height)) * FLATTENING_SCALE`, and never
/// less than [`MIN_FLATTENING_TOLERANCE`].
#[must_use]
pub fn flattening_tolerance(tip_bounds: Rect) -> f64 {
    let min = tip_bounds.width().min(tip_bounds.height());
    let tolerance = (min + min).log10() * FLATTENING_SCALE;
    if tolerance.is_nan() || tolerance < MIN_FLATTENING_TOLERANCE {
        MIN_FLATTENING_TOLERANCE
    } else {
        tolerance
    }
}

/// Smooths `points` with a Bezier fit and returns the re-sampled polyline.
///
/// With fewer than two points, or when no curve can be built, the result is a
/// value copy of the input.
#[must_use]
pub fn fit_points(
    points: &[StylusPoint],
    fitting_error: f64,
    tip_bounds: Rect,
) -> Vec<StylusPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let Some(path) = construct_bezier(points, fitting_error) else {
        log::trace!(
            "bezier construction failed for {} points; using raw points",
            points.len()
        );
        return points.to_vec();
    };

    let mut flattened: Vec<Point> = Vec::new();
    kurbo::flatten(
        path.elements().iter().copied(),
        flattening_tolerance(tip_bounds),
        |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => {
                if flattened.last() != Some(&p) {
                    flattened.push(p);
                }
            }
            _ => {}
        },
    );
    if flattened.len() < 2 {
        return points.to_vec();
    }
    resample(points, &flattened)
}

/// Builds the fitted curve, or `None` when the input cannot define one.
pub(crate) fn construct_bezier(points: &[StylusPoint], fitting_error: f64) -> Option<BezPath> {
    if !fitting_error.is_finite() || fitting_error < 0.0 {
        return None;
    }
    let mut positions: Vec<Point> = Vec::with_capacity(points.len());
    for sample in points {
        let p = sample.position;
        if !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        match positions.last() {
            Some(last) if last.distance(p) <= DUPLICATE_DISTANCE => {}
            _ => positions.push(p),
        }
    }
    if positions.len() < 2 {
        return None;
    }

    let mut path = BezPath::new();
    path.move_to(positions[0]);
    let mut start = 0;
    for i in 1..positions.len() {
        let is_end = i == positions.len() - 1;
        if is_end || is_cusp(&positions, i) {
            let span = &positions[start..=i];
            let left = unit(span[1] - span[0]);
            let right = unit(span[span.len() - 2] - span[span.len() - 1]);
            fit_span(span, left, right, fitting_error, 0, &mut path);
            start = i;
        }
    }

    let finite = path.elements().iter().all(|el| match *el {
        PathEl::CurveTo(a, b, c) => [a, b, c].iter().all(|p| p.x.is_finite() && p.y.is_finite()),
        _ => true,
    });
    finite.then_some(path)
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

fn is_cusp(positions: &[Point], i: usize) -> bool {
    let d0 = unit(positions[i] - positions[i - 1]);
    let d1 = unit(positions[i + 1] - positions[i]);
    d0.dot(d1) < CUSP_COSINE
}

fn fit_span(
    pts: &[Point],
    left: Vec2,
    right: Vec2,
    error: f64,
    depth: usize,
    out: &mut BezPath,
) {
    let n = pts.len();
    if n == 2 {
        let dist = pts[0].distance(pts[1]) / 3.0;
        out.curve_to(pts[0] + left * dist, pts[1] + right * dist, pts[1]);
        return;
    }

    let error_sq = error * error;
    let mut params = chord_length_parameterize(pts);
    let mut bez = generate_bezier(pts, &params, left, right);
    let (mut max_err, mut split) = max_error(pts, &bez, &params);
    if max_err <= error_sq {
        out.curve_to(bez.p1, bez.p2, bez.p3);
        return;
    }

    if max_err <= error_sq * 16.0 {
        for _ in 0..MAX_REPARAMETERIZE_ITERATIONS {
            let refined = reparameterize(pts, &params, &bez);
            bez = generate_bezier(pts, &refined, left, right);
            (max_err, split) = max_error(pts, &bez, &refined);
            if max_err <= error_sq {
                out.curve_to(bez.p1, bez.p2, bez.p3);
                return;
            }
            params = refined;
        }
    }

    if depth >= MAX_FIT_DEPTH {
        out.curve_to(bez.p1, bez.p2, bez.p3);
        return;
    }

    let mut center = unit(pts[split - 1] - pts[split + 1]);
    if center == Vec2::ZERO {
        let d = unit(pts[split] - pts[split - 1]);
        center = Vec2::new(-d.x, -d.y);
    }
    fit_span(&pts[..=split], left, center, error, depth + 1, out);
    fit_span(&pts[split..], -center, right, error, depth + 1, out);
}

fn chord_length_parameterize(pts: &[Point]) -> SmallVec<[f64; 32]> {
    let mut params: SmallVec<[f64; 32]> = SmallVec::with_capacity(pts.len());
    params.push(0.0);
    for i in 1..pts.len() {
        params.push(params[i - 1] + pts[i].distance(pts[i - 1]));
    }
    let total = params[pts.len() - 1];
    if total > 0.0 {
        for u in params.iter_mut() {
            *u /= total;
        }
    }
    params
}

fn generate_bezier(pts: &[Point], params: &[f64], left: Vec2, right: Vec2) -> CubicBez {
    let first = pts[0];
    let last = pts[pts.len() - 1];
    let mut c00 = 0.0;
    let mut c01 = 0.0;
    let mut c11 = 0.0;
    let mut x0 = 0.0;
    let mut x1 = 0.0;
    for (p, &t) in pts.iter().zip(params) {
        let mt = 1.0 - t;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * t * mt * mt;
        let b2 = 3.0 * t * t * mt;
        let b3 = t * t * t;
        let a0 = left * b1;
        let a1 = right * b2;
        c00 += a0.dot(a0);
        c01 += a0.dot(a1);
        c11 += a1.dot(a1);
        let tmp = p.to_vec2() - (first.to_vec2() * (b0 + b1) + last.to_vec2() * (b2 + b3));
        x0 += a0.dot(tmp);
        x1 += a1.dot(tmp);
    }

    let det = c00 * c11 - c01 * c01;
    let (mut alpha_l, mut alpha_r) = if det.abs() > f64::EPSILON {
        ((x0 * c11 - x1 * c01) / det, (c00 * x1 - c01 * x0) / det)
    } else {
        (0.0, 0.0)
    };

    let seg_len = first.distance(last);
    let epsilon = 1e-6 * seg_len;
    if !(alpha_l >= epsilon && alpha_r >= epsilon) {
        alpha_l = seg_len / 3.0;
        alpha_r = alpha_l;
    }
    CubicBez::new(first, first + left * alpha_l, last + right * alpha_r, last)
}

fn max_error(pts: &[Point], bez: &CubicBez, params: &[f64]) -> (f64, usize) {
    let n = pts.len();
    let mut split = n / 2;
    let mut max = 0.0;
    for i in 1..n - 1 {
        let d = (bez.eval(params[i]) - pts[i]).hypot2();
        if d >= max {
            max = d;
            split = i;
        }
    }
    (max, split.clamp(1, n - 2))
}

fn first_derivative(b: &CubicBez, t: f64) -> Vec2 {
    let mt = 1.0 - t;
    ((b.p1 - b.p0) * (mt * mt) + (b.p2 - b.p1) * (2.0 * mt * t) + (b.p3 - b.p2) * (t * t)) * 3.0
}

fn second_derivative(b: &CubicBez, t: f64) -> Vec2 {
    let a = b.p2.to_vec2() - b.p1.to_vec2() * 2.0 + b.p0.to_vec2();
    let c = b.p3.to_vec2() - b.p2.to_vec2() * 2.0 + b.p1.to_vec2();
    (a * (1.0 - t) + c * t) * 6.0
}

fn reparameterize(pts: &[Point], params: &[f64], bez: &CubicBez) -> SmallVec<[f64; 32]> {
    pts.iter()
        .zip(params)
        .map(|(p, &u)| {
            let diff = bez.eval(u) - *p;
            let d1 = first_derivative(bez, u);
            let d2 = second_derivative(bez, u);
            let numerator = diff.dot(d1);
            let denominator = d1.dot(d1) + diff.dot(d2);
            if denominator.abs() < f64::EPSILON {
                u
            } else {
                (u - numerator / denominator).clamp(0.0, 1.0)
            }
        })
        .collect()
}

/// Maps every flattened point back onto the source by normalized arc length
/// and interpolates pressure and extra channels there.
fn resample(source: &[StylusPoint], flattened: &[Point]) -> Vec<StylusPoint> {
    let source_cumulative = cumulative_lengths(source.iter().map(|s| s.position));
    let flat_cumulative = cumulative_lengths(flattened.iter().copied());
    let source_total = source_cumulative[source_cumulative.len() - 1];
    let flat_total = flat_cumulative[flat_cumulative.len() - 1];

    let mut out = Vec::with_capacity(flattened.len());
    let mut segment = 0;
    for (k, &position) in flattened.iter().enumerate() {
        let target = if flat_total > 0.0 {
            flat_cumulative[k] / flat_total * source_total
        } else {
            0.0
        };
        while segment + 2 < source.len() && source_cumulative[segment + 1] < target {
            segment += 1;
        }
        let a = &source[segment];
        let b = &source[segment + 1];
        let length = source_cumulative[segment + 1] - source_cumulative[segment];
        let t = if length > 0.0 {
            ((target - source_cumulative[segment]) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(interpolate_channels(a, b, t, position));
    }

    if let (Some(first), Some(last)) = (out.first_mut(), source.first()) {
        first.pressure = last.pressure;
        first.extra = last.extra.clone();
    }
    if let (Some(last_out), Some(last)) = (out.last_mut(), source.last()) {
        last_out.pressure = last.pressure;
        last_out.extra = last.extra.clone();
    }
    out
}

fn cumulative_lengths(points: impl Iterator<Item = Point>) -> SmallVec<[f64; 32]> {
    let mut out: SmallVec<[f64; 32]> = SmallVec::new();
    let mut prev: Option<Point> = None;
    for p in points {
        let acc = match (prev, out.last()) {
            (Some(q), Some(&acc)) => acc + q.distance(p),
            _ => 0.0,
        };
        out.push(acc);
        prev = Some(p);
    }
    out
}

fn interpolate_channels(a: &StylusPoint, b: &StylusPoint, t: f64, position: Point) -> StylusPoint {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pressure and channels are stored as f32"
    )]
    let lerp =
        |x: f32, y: f32| -> f32 { (f64::from(x) + (f64::from(y) - f64::from(x)) * t) as f32 };
    let extra = a
        .extra
        .iter()
        .enumerate()
        .map(|(i, &x)| lerp(x, b.extra.get(i).copied().unwrap_or(x)))
        .collect();
    StylusPoint {
        position,
        pressure: lerp(a.pressure, b.pressure).clamp(0.0, 1.0),
        extra,
    }
}

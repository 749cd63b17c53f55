// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometric helpers shared by the hit-testing code.

use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect, Vec2};
use smallvec::SmallVec;

/// Slack used when comparing projections; absorbs rounding on shared edges.
const OVERLAP_EPSILON: f64 = 1e-9;

/// Returns `true` if `affine` has finite coefficients and a usable inverse.
pub(crate) fn is_invertible(affine: &Affine) -> bool {
    if !affine.as_coeffs().iter().all(|c| c.is_finite()) {
        return false;
    }
    affine.determinant().abs() >= 10.0 * f64::EPSILON
}

/// Returns the linear part of `affine` (translation dropped).
pub(crate) fn linear_part(affine: Affine) -> Affine {
    affine.with_translation(Vec2::ZERO)
}

/// Closed-interval rectangle overlap; touching edges count.
pub(crate) fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Closed-interval containment; points on the edge count.
pub(crate) fn rect_contains(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// Bounding box of a non-empty point set.
pub(crate) fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
}

/// Signed shoelace area; positive for counter-clockwise vertex order.
pub(crate) fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

fn cmp_xy(a: &Point, b: &Point) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

fn turn(o: Point, a: Point, b: Point) -> f64 {
    (a - o).cross(b - o)
}

/// Convex hull by monotone chain, counter-clockwise.
///
/// Collinear input collapses to its two extreme points.
pub(crate) fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(cmp_xy);
    points.dedup();
    if points.len() < 3 {
        return points;
    }
    let mut hull: Vec<Point> = Vec::with_capacity(points.len() + 1);
    for &p in &points {
        while hull.len() >= 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

fn unit_edge_normals(vertices: &[Point], out: &mut SmallVec<[Vec2; 64]>) {
    let n = vertices.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let edge = vertices[(i + 1) % n] - vertices[i];
        let len = edge.hypot();
        if len > 0.0 {
            out.push(Vec2::new(-edge.y / len, edge.x / len));
        }
    }
}

fn project(vertices: impl Iterator<Item = Vec2>, axis: Vec2) -> (f64, f64) {
    vertices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        let d = v.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Narrows `[lo, hi]` to the parameters where `f0 + (f1 - f0) t <= bound`.
fn restrict_le(lo: &mut f64, hi: &mut f64, f0: f64, f1: f64, bound: f64) -> bool {
    let d = f1 - f0;
    if d.abs() < 1e-12 {
        return f0 <= bound;
    }
    let t = (bound - f0) / d;
    if d > 0.0 {
        *hi = hi.min(t);
    } else {
        *lo = lo.max(t);
    }
    *lo <= *hi
}

/// Parameter interval in `[0, 1]` where a moving convex tip overlaps `target`.
///
/// The tip outline `tip` is given relative to its center. At parameter `t`
/// it is centered at `c0.lerp(c1, t)` and scaled by `s0 + (s1 - s0) t`.
/// Both the center and the projected extents are affine in `t`, so each
/// separating axis excludes a half-line and the overlap set is one interval.
/// Axes are the edge normals of both outlines, which is complete for convex
/// polygons at every `t`.
pub(crate) fn sweep_overlap(
    c0: Point,
    c1: Point,
    s0: f64,
    s1: f64,
    tip: &[Vec2],
    target: &[Point],
) -> Option<(f64, f64)> {
    if tip.is_empty() || target.is_empty() {
        return None;
    }
    let tip_points: SmallVec<[Point; 32]> = tip.iter().map(|v| v.to_point()).collect();
    let mut axes: SmallVec<[Vec2; 64]> = SmallVec::new();
    unit_edge_normals(&tip_points, &mut axes);
    unit_edge_normals(target, &mut axes);
    if axes.is_empty() {
        // Two points: overlap only where the centers coincide with the target.
        axes.push(Vec2::new(1.0, 0.0));
        axes.push(Vec2::new(0.0, 1.0));
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for axis in axes {
        let (kmin, kmax) = project(tip.iter().copied(), axis);
        let (emin, emax) = project(target.iter().map(|p| p.to_vec2()), axis);
        let c0n = c0.to_vec2().dot(axis);
        let c1n = c1.to_vec2().dot(axis);
        // Leading extent must not pass beyond the far side of the target...
        if !restrict_le(
            &mut lo,
            &mut hi,
            c0n + s0 * kmin,
            c1n + s1 * kmin,
            emax + OVERLAP_EPSILON,
        ) {
            return None;
        }
        // ...and the trailing extent must reach the near side.
        if !restrict_le(
            &mut lo,
            &mut hi,
            -(c0n + s0 * kmax),
            -(c1n + s1 * kmax),
            -(emin - OVERLAP_EPSILON),
        ) {
            return None;
        }
    }
    Some((lo, hi))
}

/// Intersection parameters `(t, u)` of segments `p0-p1` and `q0-q1`.
///
/// Parallel and collinear segments report no intersection.
pub(crate) fn segment_intersection(
    p0: Point,
    p1: Point,
    q0: Point,
    q1: Point,
) -> Option<(f64, f64)> {
    let r = p1 - p0;
    let s = q1 - q0;
    let denom = r.cross(s);
    if denom.abs() < 1e-12 {
        return None;
    }
    let qp = q0 - p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Even-odd point-in-polygon test over the implicitly closed `poly`.
pub(crate) fn even_odd_contains(poly: &[Point], p: Point) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = poly[i];
        let b = poly[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

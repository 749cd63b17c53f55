// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-form selection regions built from streamed pointer samples.
//!
//! A [`Lasso`] accumulates polygon vertices batch by batch. Containment uses
//! the even-odd rule over the implicitly closed polygon, after a cheap
//! bounding-box rejection.
//!
//! A single-loop lasso refuses to cross itself: the first time a new edge
//! crosses an earlier edge, the loop is closed at the crossing, the tail that
//! led into the loop is dropped, and every later point is ignored. The batch
//! that caused this is flagged through [`Lasso::is_incremental_dirty`] so that
//! incremental consumers know the region changed in more than an appended
//! sliver.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::findices::{StrokeFIndices, StrokeIntersection, normalize};
use crate::util::{
    bounds_of, even_odd_contains, rect_contains, rects_overlap, segment_intersection, signed_area,
};

/// Points closer than this to the previous vertex on both axes are dropped.
pub const LASSO_MIN_DISTANCE: f64 = 1.0;

/// Polygons with less area than this are treated as empty.
const MIN_AREA: f64 = 1e-12;

/// Crossings this close along a stroke are treated as one.
const CROSSING_EPSILON: f64 = 1e-9;

/// An incrementally built selection polygon.
#[derive(Clone, Debug, Default)]
pub struct Lasso {
    points: Vec<Point>,
    bounds: Option<Rect>,
    filtered: bool,
    single_loop: bool,
    closed: bool,
    incremental_dirty: bool,
}

impl Lasso {
    /// Creates an empty lasso that drops near-duplicate points.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filtered: true,
            ..Self::default()
        }
    }

    /// Creates an empty lasso that closes itself at its first self-crossing.
    #[must_use]
    pub fn single_loop() -> Self {
        Self {
            filtered: true,
            single_loop: true,
            ..Self::default()
        }
    }

    /// Creates a lasso from exact polygon vertices, without filtering.
    #[must_use]
    pub fn from_polygon(vertices: impl IntoIterator<Item = Point>) -> Self {
        let points: Vec<Point> = vertices.into_iter().collect();
        Self {
            bounds: bounds_of(points.iter().copied()),
            points,
            ..Self::default()
        }
    }

    /// Creates a lasso covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_polygon([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    /// Appends a single point as its own batch.
    pub fn add_point(&mut self, point: Point) {
        self.add_points([point]);
    }

    /// Appends a batch of points.
    ///
    /// Resets [`is_incremental_dirty`](Self::is_incremental_dirty) before the
    /// batch is applied.
    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point>) {
        self.incremental_dirty = false;
        for point in points {
            if self.closed {
                break;
            }
            if !point.x.is_finite() || !point.y.is_finite() {
                continue;
            }
            if self.filtered
                && self.points.last().is_some_and(|last| {
                    (last.x - point.x).abs() < LASSO_MIN_DISTANCE
                        && (last.y - point.y).abs() < LASSO_MIN_DISTANCE
                })
            {
                continue;
            }
            if self.single_loop && self.close_loop_at_crossing(point) {
                continue;
            }
            self.points.push(point);
            self.bounds = Some(match self.bounds {
                Some(b) => b.union_pt(point),
                None => Rect::from_points(point, point),
            });
        }
    }

    /// Closes the loop if the edge towards `point` crosses an earlier edge.
    fn close_loop_at_crossing(&mut self, point: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let from = self.points[n - 1];
        // The edge ending at `from` shares an endpoint with the new edge.
        let mut first: Option<(f64, usize)> = None;
        for i in 0..n - 2 {
            let crossing = segment_intersection(from, point, self.points[i], self.points[i + 1])
                .map(|(t, _)| t)
                .filter(|&t| t > CROSSING_EPSILON);
            if let Some(t) = crossing.filter(|&t| first.is_none_or(|(best, _)| t < best)) {
                first = Some((t, i));
            }
        }
        let Some((t, edge)) = first else {
            return false;
        };
        let crossing = from.lerp(point, t);
        let mut loop_points = Vec::with_capacity(n - edge);
        loop_points.push(crossing);
        loop_points.extend_from_slice(&self.points[edge + 1..]);
        self.bounds = bounds_of(loop_points.iter().copied());
        self.points = loop_points;
        self.closed = true;
        self.incremental_dirty = true;
        true
    }

    /// Returns `true` if the lasso encloses no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3 || signed_area(&self.points).abs() < MIN_AREA
    }

    /// Bounding box of the vertices, if there are any.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Vertex `index`.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// All vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if the last batch changed the lasso other than by
    /// appending vertices.
    #[must_use]
    pub fn is_incremental_dirty(&self) -> bool {
        self.incremental_dirty
    }

    /// Returns `true` if a single-loop lasso has closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Even-odd containment.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        match self.bounds {
            Some(b) if rect_contains(b, point) => even_odd_contains(&self.points, point),
            _ => false,
        }
    }

    /// Inside parts of the polyline through `points`.
    ///
    /// The polyline is cut wherever it crosses the lasso boundary; each piece
    /// is inside or outside as a whole, decided at its midpoint. The result is
    /// sorted and non-overlapping.
    #[must_use]
    pub fn hit_test_points(&self, points: &[Point]) -> Vec<StrokeIntersection> {
        let Some(lasso_bounds) = self.bounds else {
            return Vec::new();
        };
        if self.is_empty() || points.is_empty() {
            return Vec::new();
        }
        match bounds_of(points.iter().copied()) {
            Some(b) if rects_overlap(b, lasso_bounds) => {}
            _ => return Vec::new(),
        }
        if points.len() == 1 {
            return if self.contains(points[0]) {
                alloc::vec![StrokeIntersection::new(StrokeFIndices::FULL)]
            } else {
                Vec::new()
            };
        }

        let n = self.points.len();
        let mut cuts: Vec<f64> = alloc::vec![0.0];
        for (i, seg) in points.windows(2).enumerate() {
            let seg_bounds = Rect::from_points(seg[0], seg[1]);
            if !rects_overlap(seg_bounds, lasso_bounds) {
                continue;
            }
            let base = i as f64;
            for j in 0..n {
                let a = self.points[j];
                let b = self.points[(j + 1) % n];
                if let Some((t, _)) = segment_intersection(seg[0], seg[1], a, b) {
                    cuts.push(base + t);
                }
            }
        }
        let last_index = (points.len() - 1) as f64;
        cuts.push(last_index);
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|b, a| (*b - *a).abs() <= CROSSING_EPSILON);

        let mut inside = Vec::new();
        for pair in cuts.windows(2) {
            let (begin, end) = (pair[0], pair[1]);
            if end <= begin {
                continue;
            }
            if self.contains(position_at(points, (begin + end) * 0.5)) {
                inside.push(StrokeFIndices::new(begin, end));
            }
        }
        normalize(&inside, last_index)
            .into_iter()
            .map(StrokeIntersection::widened)
            .collect()
    }
}

/// Position at fractional index `findex` along `points`.
pub(crate) fn position_at(points: &[Point], findex: f64) -> Point {
    let last = points.len() - 1;
    let floor = findex.floor();
    if floor < 0.0 {
        return points[0];
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "non-negative index already floored"
    )]
    let i = floor as usize;
    if i >= last {
        return points[last];
    }
    points[i].lerp(points[i + 1], findex - floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Lasso {
        let mut lasso = Lasso::new();
        lasso.add_points([
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]);
        lasso
    }

    #[test]
    fn empty_until_three_non_collinear_points() {
        let mut lasso = Lasso::new();
        lasso.add_points([Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert!(lasso.is_empty());
        lasso.add_point(Point::new(20.0, 0.0));
        assert!(lasso.is_empty());
        lasso.add_point(Point::new(20.0, 20.0));
        assert!(!lasso.is_empty());
    }

    #[test]
    fn near_duplicates_are_filtered() {
        let mut lasso = Lasso::new();
        lasso.add_points([
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(0.5, 3.0),
        ]);
        assert_eq!(lasso.len(), 2);
        let exact = Lasso::from_polygon([Point::new(0.0, 0.0), Point::new(0.5, 0.5)]);
        assert_eq!(exact.len(), 2);
    }

    #[test]
    fn contains_uses_even_odd() {
        let lasso = square(10.0);
        assert!(lasso.contains(Point::new(5.0, 5.0)));
        assert!(!lasso.contains(Point::new(-5.0, 5.0)));
        assert_eq!(lasso.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn single_loop_closes_at_first_crossing() {
        let mut lasso = Lasso::single_loop();
        lasso.add_points([
            Point::new(-10.0, 5.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 15.0),
            Point::new(5.0, 15.0),
        ]);
        assert!(!lasso.is_incremental_dirty());
        lasso.add_points([Point::new(5.0, 0.0), Point::new(100.0, 100.0)]);
        assert!(lasso.is_incremental_dirty());
        assert!(lasso.is_closed());
        let start = lasso.point(0).unwrap();
        assert!(start.distance(Point::new(5.0, 5.0)) < 1e-9);
        assert_eq!(lasso.len(), 4);
        assert!(lasso.contains(Point::new(7.0, 10.0)));

        lasso.add_point(Point::new(200.0, 0.0));
        assert!(!lasso.is_incremental_dirty());
        assert_eq!(lasso.len(), 4);
    }

    #[test]
    fn polyline_inside_parts_are_cut_at_the_boundary() {
        let lasso = square(10.0);
        let stroke = [Point::new(-5.0, 5.0), Point::new(5.0, 5.0), Point::new(15.0, 5.0)];
        let hits = lasso.hit_test_points(&stroke);
        assert_eq!(hits.len(), 1);
        let inside = hits[0].in_segment;
        assert!((inside.begin - 0.5).abs() < 1e-9);
        assert!((inside.end - 1.5).abs() < 1e-9);
        assert_eq!(hits[0].hit, StrokeFIndices::new(0.0, 2.0));
    }

    #[test]
    fn fully_inside_polyline_is_full() {
        let lasso = square(10.0);
        let stroke = [Point::new(2.0, 2.0), Point::new(8.0, 8.0)];
        let hits = lasso.hit_test_points(&stroke);
        assert_eq!(hits, [StrokeIntersection::widened(StrokeFIndices::FULL)]);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke nodes: the swept tip between two consecutive stroke points.
//!
//! Node `i` covers the part of the stroke between point `i - 1` and point
//! `i`. Its contour is the convex hull of the tip placed (and scaled by
//! pressure) at both points, which is exactly the area the tip sweeps while
//! its center and scale move linearly between them. The first node has no
//! predecessor and is just the tip at point `0`.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::attributes::DrawingAttributes;
use crate::point::StylusPoint;
use crate::shape::StylusShape;
use crate::util::{bounds_of, convex_hull, sweep_overlap};

/// One segment of ink between two consecutive stroke points.
#[derive(Clone, Debug)]
pub struct StrokeNode {
    index: usize,
    position: Point,
    factor: f64,
    previous: Option<(Point, f64)>,
    tip: Rc<[Vec2]>,
}

impl StrokeNode {
    /// Index of the point this node ends at.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Center of the tip at the end of the node.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Center of the tip at the start of the node, if there is one.
    #[must_use]
    pub fn previous_position(&self) -> Option<Point> {
        self.previous.map(|(p, _)| p)
    }

    /// Tip scale at the end of the node.
    #[must_use]
    pub fn pressure_factor(&self) -> f64 {
        self.factor
    }

    fn start(&self) -> (Point, f64) {
        self.previous.unwrap_or((self.position, self.factor))
    }

    /// Convex outline swept by the tip over this node, counter-clockwise.
    ///
    /// Empty when the tip has no area.
    #[must_use]
    pub fn contour(&self) -> Vec<Point> {
        if self.tip.is_empty() {
            return Vec::new();
        }
        let (p0, s0) = self.start();
        let mut points = Vec::with_capacity(self.tip.len() * 2);
        points.extend(self.tip.iter().map(|v| self.position + *v * self.factor));
        if self.previous.is_some() {
            points.extend(self.tip.iter().map(|v| p0 + *v * s0));
        }
        convex_hull(points)
    }

    /// Axis-aligned bounds of [`contour`](Self::contour).
    ///
    /// A node with an empty tip is bounded by its centerline.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let (p0, _) = self.start();
        bounds_of(self.contour()).unwrap_or_else(|| Rect::from_points(p0, self.position))
    }

    /// Fractional-index range over which this node overlaps `polygon`.
    ///
    /// `polygon` must be convex. The range is exact: the tip's center and
    /// scale are interpolated linearly along the node, so the overlapping
    /// parameters form one interval. For the first node the range is
    /// `(0.0, 0.0)` when the tip touches the polygon.
    #[must_use]
    pub fn cut_test(&self, polygon: &[Point]) -> Option<(f64, f64)> {
        let (p0, s0) = self.start();
        let (lo, hi) = sweep_overlap(p0, self.position, s0, self.factor, &self.tip, polygon)?;
        if self.previous.is_none() {
            return Some((0.0, 0.0));
        }
        let base = (self.index - 1) as f64;
        Some((base + lo, base + hi))
    }
}

/// Produces the [`StrokeNode`]s of a point sequence under a tip shape.
#[derive(Clone, Debug)]
pub struct StrokeNodeIterator<'a> {
    points: &'a [StylusPoint],
    tip: Rc<[Vec2]>,
    ignore_pressure: bool,
    next: usize,
    previous: Option<(Point, f64)>,
}

impl<'a> StrokeNodeIterator<'a> {
    /// Nodes of `points` drawn with `attributes`.
    #[must_use]
    pub fn new(points: &'a [StylusPoint], attributes: &DrawingAttributes) -> Self {
        Self::with_shape(
            points,
            &attributes.stylus_shape(),
            attributes.ignore_pressure(),
        )
    }

    /// Nodes of `points` drawn with an explicit tip shape.
    #[must_use]
    pub fn with_shape(
        points: &'a [StylusPoint],
        shape: &StylusShape,
        ignore_pressure: bool,
    ) -> Self {
        Self {
            points,
            tip: Rc::from(shape.vertices().as_slice()),
            ignore_pressure,
            next: 0,
            previous: None,
        }
    }
}

impl Iterator for StrokeNodeIterator<'_> {
    type Item = StrokeNode;

    fn next(&mut self) -> Option<StrokeNode> {
        let sample = self.points.get(self.next)?;
        let factor = if self.ignore_pressure {
            1.0
        } else {
            sample.pressure_factor()
        };
        let node = StrokeNode {
            index: self.next,
            position: sample.position,
            factor,
            previous: self.previous,
            tip: self.tip.clone(),
        };
        self.previous = Some((sample.position, factor));
        self.next += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StrokeNodeIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::stylus_points_from;

    #[test]
    fn first_node_is_the_bare_tip() {
        let points = stylus_points_from([(3.0, 4.0), (10.0, 4.0)]);
        let shape = StylusShape::rectangle(2.0, 2.0);
        let first = StrokeNodeIterator::with_shape(&points, &shape, true)
            .next()
            .unwrap();
        assert_eq!(first.bounds(), Rect::new(2.0, 3.0, 4.0, 5.0));
        assert!(first.previous_position().is_none());
    }

    #[test]
    fn segment_node_covers_both_ends() {
        let points = stylus_points_from([(0.0, 0.0), (10.0, 0.0)]);
        let shape = StylusShape::rectangle(2.0, 2.0);
        let nodes: Vec<_> = StrokeNodeIterator::with_shape(&points, &shape, true).collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].bounds(), Rect::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn pressure_scales_the_tip() {
        let points = [StylusPoint::with_pressure(0.0, 0.0, 1.0)];
        let shape = StylusShape::rectangle(2.0, 2.0);
        let node = StrokeNodeIterator::with_shape(&points, &shape, false)
            .next()
            .unwrap();
        assert_eq!(node.bounds(), Rect::new(-2.0, -2.0, 2.0, 2.0));
        let ignored = StrokeNodeIterator::with_shape(&points, &shape, true)
            .next()
            .unwrap();
        assert_eq!(ignored.bounds(), Rect::new(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn cut_test_reports_fractional_indices() {
        let points = stylus_points_from([(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let shape = StylusShape::rectangle(2.0, 2.0);
        let nodes: Vec<_> = StrokeNodeIterator::with_shape(&points, &shape, true).collect();
        let target = [
            Point::new(14.0, -5.0),
            Point::new(16.0, -5.0),
            Point::new(16.0, 5.0),
            Point::new(14.0, 5.0),
        ];
        assert!(nodes[1].cut_test(&target).is_none());
        let (lo, hi) = nodes[2].cut_test(&target).unwrap();
        assert!((lo - 1.3).abs() < 1e-6);
        assert!((hi - 1.7).abs() < 1e-6);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stylus shape swept along a path, used for erasing and tap hits.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::findices::{StrokeFIndices, StrokeIntersection, normalize};
use crate::node::StrokeNode;
use crate::shape::{ShapeVertices, StylusShape};
use crate::util::{bounds_of, convex_hull, rects_overlap};

/// A convex part of the swept contour.
#[derive(Clone, Debug)]
struct ContourPiece {
    polygon: Vec<Point>,
    bounds: Rect,
}

/// The area covered by a stylus shape moving along a path.
///
/// The contour is kept as a list of convex pieces: the bare shape at the
/// first point, then the hull of the shape at each pair of consecutive path
/// points. [`move_to`](Self::move_to) replaces the contour with the sweep
/// from the last known point through the new path, so tests only see the
/// most recent movement.
#[derive(Clone, Debug)]
pub struct ErasingStroke {
    tip: ShapeVertices,
    last: Option<Point>,
    pieces: Vec<ContourPiece>,
    bounds: Option<Rect>,
}

impl ErasingStroke {
    /// Sweeps `shape` along `path`.
    ///
    /// An empty path or an empty shape produces an empty contour.
    #[must_use]
    pub fn new(shape: &StylusShape, path: impl IntoIterator<Item = Point>) -> Self {
        let mut stroke = Self {
            tip: shape.vertices(),
            last: None,
            pieces: Vec::new(),
            bounds: None,
        };
        stroke.move_to(path);
        stroke
    }

    /// Continues the sweep from the last point through `path`.
    ///
    /// The previous contour is discarded. An empty `path` leaves the
    /// erasing stroke unchanged; a path with no finite point leaves an empty
    /// contour.
    pub fn move_to(&mut self, path: impl IntoIterator<Item = Point>) {
        let mut path = path.into_iter().peekable();
        if path.peek().is_none() {
            return;
        }
        self.pieces.clear();
        let mut previous = self.last;
        for point in path.filter(|p| p.x.is_finite() && p.y.is_finite()) {
            if self.tip.is_empty() {
                previous = Some(point);
                continue;
            }
            match previous {
                None => self.push_piece(self.placed(point).collect()),
                Some(p) if p == point => {
                    if self.pieces.is_empty() {
                        self.push_piece(self.placed(point).collect());
                    }
                }
                Some(p) => {
                    let mut hull: Vec<Point> = self.placed(p).collect();
                    hull.extend(self.placed(point));
                    self.push_piece(convex_hull(hull));
                }
            }
            previous = Some(point);
        }
        self.last = previous;
        self.bounds = self
            .pieces
            .iter()
            .map(|piece| piece.bounds)
            .reduce(|a, b| a.union(b));
    }

    fn placed(&self, center: Point) -> impl Iterator<Item = Point> + '_ {
        self.tip.iter().map(move |v: &Vec2| center + *v)
    }

    fn push_piece(&mut self, polygon: Vec<Point>) {
        if let Some(bounds) = bounds_of(polygon.iter().copied()) {
            self.pieces.push(ContourPiece { polygon, bounds });
        }
    }

    /// Bounds of the current contour, or `None` when it is empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Convex pieces of the current contour.
    pub fn contour(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.pieces.iter().map(|piece| piece.polygon.as_slice())
    }

    /// Last point of the path swept so far.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        self.last
    }

    /// Returns `true` if the contour touches any of `nodes`.
    #[must_use]
    pub fn hit_test(&self, nodes: impl IntoIterator<Item = StrokeNode>) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        nodes.into_iter().any(|node| {
            let node_bounds = node.bounds();
            rects_overlap(node_bounds, bounds)
                && self.pieces.iter().any(|piece| {
                    rects_overlap(node_bounds, piece.bounds)
                        && node.cut_test(&piece.polygon).is_some()
                })
        })
    }

    /// Where the contour covers `nodes`, sorted by position.
    #[must_use]
    pub fn erase_test(
        &self,
        nodes: impl IntoIterator<Item = StrokeNode>,
    ) -> Vec<StrokeIntersection> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        let mut ranges = Vec::new();
        let mut last_index = 0;
        for node in nodes {
            last_index = node.index();
            let node_bounds = node.bounds();
            if !rects_overlap(node_bounds, bounds) {
                continue;
            }
            for piece in &self.pieces {
                if !rects_overlap(node_bounds, piece.bounds) {
                    continue;
                }
                if let Some((begin, end)) = node.cut_test(&piece.polygon) {
                    ranges.push(StrokeFIndices::new(begin, end));
                }
            }
        }
        normalize(&ranges, last_index as f64)
            .into_iter()
            .map(StrokeIntersection::new)
            .collect()
    }
}

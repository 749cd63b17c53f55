// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-stroke cache entries kept by the incremental hit testers.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use understory_ink::{PointWeights, Stroke, StrokeId};

/// What a hit tester remembers about one stroke of its collection.
///
/// The entry is a snapshot of the stroke at [`revision`](Self::revision).
/// When the stroke's revision moves on, [`refresh`](Self::refresh) retakes the
/// snapshot and marks the entry dirty, so the next lasso step recomputes the
/// hit weight from scratch instead of adjusting it.
#[derive(Clone, Debug)]
pub struct StrokeInfo {
    id: StrokeId,
    revision: u64,
    bounds: Rect,
    points: Vec<Point>,
    weights: PointWeights,
    pub(crate) hit_weight: f64,
    pub(crate) is_hit: bool,
    pub(crate) dirty: bool,
}

impl StrokeInfo {
    /// Snapshot of `stroke`, dirty until first tested.
    #[must_use]
    pub fn new(stroke: &Stroke) -> Self {
        Self {
            id: stroke.id(),
            revision: stroke.revision(),
            bounds: stroke.bounds(),
            points: positions(stroke),
            weights: stroke.point_weights(),
            hit_weight: 0.0,
            is_hit: false,
            dirty: true,
        }
    }

    /// Retakes the snapshot if `stroke` changed since it was taken.
    ///
    /// Returns `true` if the entry became dirty.
    pub fn refresh(&mut self, stroke: &Stroke) -> bool {
        if stroke.revision() == self.revision {
            return false;
        }
        self.revision = stroke.revision();
        self.bounds = stroke.bounds();
        self.points = positions(stroke);
        self.weights = stroke.point_weights();
        self.dirty = true;
        true
    }

    /// Identity of the stroke.
    #[must_use]
    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Stroke revision the snapshot was taken at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bounds of the stroke's ink.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Effective point positions.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Weights of [`points`](Self::points).
    #[must_use]
    pub fn weights(&self) -> &PointWeights {
        &self.weights
    }

    /// Accumulated weight of the points inside the current region.
    #[must_use]
    pub fn hit_weight(&self) -> f64 {
        self.hit_weight
    }

    /// Whether the stroke currently counts as hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    /// Whether the hit weight must be recomputed rather than adjusted.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Inclusive rectangle overlap; touching edges count.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

fn positions(stroke: &Stroke) -> Vec<Point> {
    stroke.effective_points().iter().map(|p| p.position).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Affine;
    use understory_ink::stylus_points_from;

    #[test]
    fn refresh_tracks_revision() {
        let mut stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (10.0, 0.0)])).unwrap();
        let mut info = StrokeInfo::new(&stroke);
        assert!(info.is_dirty());
        info.dirty = false;

        assert!(!info.refresh(&stroke));
        assert!(!info.is_dirty());

        stroke.transform(Affine::translate((0.0, 5.0)), false).unwrap();
        assert!(info.refresh(&stroke));
        assert!(info.is_dirty());
        assert_eq!(info.points()[1], Point::new(10.0, 5.0));
        assert_eq!(info.revision(), stroke.revision());
    }
}

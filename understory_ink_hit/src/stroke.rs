// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental eraser hit testing.

use alloc::vec::Vec;

use kurbo::Point;
use understory_ink::{
    ErasingStroke, InkError, Stroke, StrokeCollection, StrokeFIndices, StrokeId,
    StrokeIntersection, StylusShape, hit_segments,
};

use crate::cache::StrokeInfoCache;
use crate::info::overlaps;

/// One stroke touched by the latest eraser movement.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeHitEvent {
    stroke: StrokeId,
    intersections: Vec<StrokeIntersection>,
}

impl StrokeHitEvent {
    /// The stroke that was hit.
    #[must_use]
    pub fn stroke(&self) -> StrokeId {
        self.stroke
    }

    /// Where the eraser met the stroke, sorted by position.
    #[must_use]
    pub fn intersections(&self) -> &[StrokeIntersection] {
        &self.intersections
    }

    /// The touched ranges of the stroke, in fractional indices.
    #[must_use]
    pub fn hit_fragments(&self) -> Vec<StrokeFIndices> {
        hit_segments(&self.intersections)
    }

    /// What remains of the hit stroke once the touched ranges are erased.
    ///
    /// The stroke is looked up in `collection` by identity.
    pub fn point_erase_results(
        &self,
        collection: &StrokeCollection,
    ) -> Result<Vec<Stroke>, InkError> {
        let stroke = collection
            .get_by_id(self.stroke)
            .ok_or(InkError::StrokeNotFound(self.stroke))?;
        Ok(stroke.erase_at(&self.hit_fragments()))
    }

    /// Replaces the hit stroke in `collection` with its
    /// [`point_erase_results`](Self::point_erase_results).
    pub fn apply_point_erase(&self, collection: &mut StrokeCollection) -> Result<(), InkError> {
        let remaining = self.point_erase_results(collection)?;
        collection.replace(self.stroke, remaining)?;
        Ok(())
    }
}

/// Eraser that moves through a collection point by point.
///
/// Each call sweeps the eraser shape from its last position through the new
/// points and reports the strokes that sweep touches. The collection is never
/// modified here; callers complete the erase with
/// [`StrokeHitEvent::apply_point_erase`] or by removing whole strokes.
#[derive(Debug)]
pub struct IncrementalStrokeHitTester {
    cache: StrokeInfoCache,
    shape: StylusShape,
    eraser: Option<ErasingStroke>,
}

impl IncrementalStrokeHitTester {
    /// Starts erasing over `collection` with `shape`.
    pub fn new(collection: &mut StrokeCollection, shape: StylusShape) -> Self {
        Self {
            cache: StrokeInfoCache::new(collection),
            shape,
            eraser: None,
        }
    }

    /// The eraser shape.
    #[must_use]
    pub fn shape(&self) -> &StylusShape {
        &self.shape
    }

    /// The eraser's latest sweep, once it has moved.
    #[must_use]
    pub fn erasing_stroke(&self) -> Option<&ErasingStroke> {
        self.eraser.as_ref()
    }

    /// Returns `false` once hit testing has ended.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cache.is_valid()
    }

    /// Moves the eraser to `point`.
    pub fn add_point(
        &mut self,
        collection: &StrokeCollection,
        point: Point,
    ) -> Result<Vec<StrokeHitEvent>, InkError> {
        self.add_points(collection, [point])
    }

    /// Moves the eraser through `points` and reports every stroke it touched,
    /// one event per stroke in collection order.
    pub fn add_points(
        &mut self,
        collection: &StrokeCollection,
        points: impl IntoIterator<Item = Point>,
    ) -> Result<Vec<StrokeHitEvent>, InkError> {
        let points: Vec<Point> = points.into_iter().collect();
        self.cache.begin_batch(collection, points.len())?;

        if let Some(eraser) = &mut self.eraser {
            eraser.move_to(points);
        } else {
            self.eraser = Some(ErasingStroke::new(&self.shape, points));
        }
        let Some((eraser, bounds)) = self
            .eraser
            .as_ref()
            .and_then(|eraser| Some((eraser, eraser.bounds()?)))
        else {
            return Ok(Vec::new());
        };

        let mut events = Vec::new();
        for (info, stroke) in self.cache.infos().iter().zip(collection) {
            if !overlaps(info.bounds(), bounds) {
                continue;
            }
            let intersections = stroke.erase_test(eraser);
            if !intersections.is_empty() {
                events.push(StrokeHitEvent {
                    stroke: info.id(),
                    intersections,
                });
            }
        }
        Ok(events)
    }

    /// Stops following the collection.
    pub fn end_hit_testing(&mut self, collection: &mut StrokeCollection) -> Result<(), InkError> {
        self.cache.end(collection)?;
        self.eraser = None;
        Ok(())
    }
}

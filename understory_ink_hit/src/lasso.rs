// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental lasso selection.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use understory_ink::{InkError, Lasso, StrokeCollection, StrokeId, check_percent};

use crate::cache::StrokeInfoCache;
use crate::info::{StrokeInfo, overlaps};

/// Strokes whose hit state flipped during one [`add_points`] call.
///
/// [`add_points`]: IncrementalLassoHitTester::add_points
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LassoSelectionChanged {
    /// Strokes that became hit, in collection order.
    pub selected: Vec<StrokeId>,
    /// Strokes that stopped being hit, in collection order.
    pub deselected: Vec<StrokeId>,
}

impl LassoSelectionChanged {
    /// Returns `true` if no stroke flipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }
}

/// Lasso selection that grows point by point.
///
/// Each stroke's inside weight is kept between calls. When the lasso grows by
/// a few vertices, only the points inside the region between the old and the
/// new boundary change sides, so only their weights are added or subtracted.
/// Strokes that changed since the last call, and every stroke after the
/// lasso closed its loop, get their weight recomputed against the whole lasso
/// instead.
///
/// A stroke is hit when its inside weight reaches `percent` of its total
/// weight, with the same threshold as [`StrokeCollection::hit_test_lasso`].
#[derive(Debug)]
pub struct IncrementalLassoHitTester {
    cache: StrokeInfoCache,
    lasso: Lasso,
    percent: u32,
}

impl IncrementalLassoHitTester {
    /// Starts a lasso selection over `collection`.
    pub fn new(collection: &mut StrokeCollection, percent: u32) -> Result<Self, InkError> {
        check_percent(percent)?;
        Ok(Self {
            cache: StrokeInfoCache::new(collection),
            lasso: Lasso::single_loop(),
            percent,
        })
    }

    /// Required inside percentage.
    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// The lasso accumulated so far.
    #[must_use]
    pub fn lasso(&self) -> &Lasso {
        &self.lasso
    }

    /// Currently hit strokes, in collection order as of the last call.
    #[must_use]
    pub fn selection(&self) -> Vec<StrokeId> {
        self.cache
            .infos()
            .iter()
            .filter(|info| info.is_hit())
            .map(StrokeInfo::id)
            .collect()
    }

    /// Cached per-stroke state as of the last call.
    #[must_use]
    pub fn stroke_infos(&self) -> &[StrokeInfo] {
        self.cache.infos()
    }

    /// Returns `false` once hit testing has ended.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cache.is_valid()
    }

    /// Extends the lasso by one point.
    pub fn add_point(
        &mut self,
        collection: &StrokeCollection,
        point: Point,
    ) -> Result<Option<LassoSelectionChanged>, InkError> {
        self.add_points(collection, [point])
    }

    /// Extends the lasso by `points` and reports the strokes that flipped.
    ///
    /// Returns `Ok(None)` when no stroke changed state.
    pub fn add_points(
        &mut self,
        collection: &StrokeCollection,
        points: impl IntoIterator<Item = Point>,
    ) -> Result<Option<LassoSelectionChanged>, InkError> {
        let points: Vec<Point> = points.into_iter().collect();
        self.cache.begin_batch(collection, points.len())?;

        let previous_len = self.lasso.len();
        let was_empty = self.lasso.is_empty();
        self.lasso.add_points(points);
        let grew = self.lasso.len() != previous_len;
        let recompute_all = was_empty || self.lasso.is_incremental_dirty();
        if !grew && !recompute_all && !self.cache.infos().iter().any(StrokeInfo::is_dirty) {
            return Ok(None);
        }

        let delta = if recompute_all || !grew {
            None
        } else {
            delta_lasso(&self.lasso, previous_len)
        };
        let lasso = &self.lasso;
        let lasso_bounds = lasso.bounds();
        let percent = self.percent;

        let mut changed = LassoSelectionChanged::default();
        for info in self.cache.entries_mut() {
            if recompute_all || info.is_dirty() {
                info.hit_weight = match lasso_bounds {
                    Some(b) if overlaps(b, info.bounds()) => {
                        info.weights().weight_where(info.points(), |p| lasso.contains(p))
                    }
                    _ => 0.0,
                };
                info.dirty = false;
            } else if let Some((delta, _)) = delta
                .as_ref()
                .filter(|(_, bounds)| overlaps(*bounds, info.bounds()))
            {
                info.hit_weight += delta_weight(info, delta, lasso);
            }

            let is_hit = info.weights().is_hit(info.hit_weight, percent);
            if is_hit != info.is_hit {
                info.is_hit = is_hit;
                if is_hit {
                    changed.selected.push(info.id());
                } else {
                    changed.deselected.push(info.id());
                }
            }
        }
        Ok((!changed.is_empty()).then_some(changed))
    }

    /// Stops following the collection.
    pub fn end_hit_testing(&mut self, collection: &mut StrokeCollection) -> Result<(), InkError> {
        self.cache.end(collection)
    }
}

/// Region between the lasso before and after growing past `previous_len`.
///
/// Under even-odd filling the new lasso is the old one toggled by the polygon
/// through the first vertex, the old last vertex, and the new vertices.
fn delta_lasso(lasso: &Lasso, previous_len: usize) -> Option<(Lasso, Rect)> {
    let points = lasso.points();
    let first = *points.first()?;
    let old_last = *points.get(previous_len.checked_sub(1)?)?;
    let delta = Lasso::from_polygon(
        [first, old_last]
            .into_iter()
            .chain(points[previous_len..].iter().copied()),
    );
    let bounds = delta.bounds()?;
    Some((delta, bounds))
}

/// Signed change of `info`'s inside weight across the delta region.
fn delta_weight(info: &StrokeInfo, delta: &Lasso, lasso: &Lasso) -> f64 {
    info.points()
        .iter()
        .zip(info.weights().as_slice())
        .filter(|(p, _)| delta.contains(**p))
        .map(|(p, w)| if lasso.contains(*p) { *w } else { -*w })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_ink::{Stroke, stylus_points_from};

    fn dot_row(y: f64) -> Stroke {
        Stroke::new(stylus_points_from([(0.0, y), (4.0, y), (8.0, y)])).unwrap()
    }

    #[test]
    fn growing_lasso_completes_a_partial_selection() {
        let low = dot_row(0.0);
        let high = dot_row(30.0);
        let (low_id, high_id) = (low.id(), high.id());
        let mut c = StrokeCollection::from_strokes(vec![low, high]).unwrap();
        let mut tester = IncrementalLassoHitTester::new(&mut c, 60).unwrap();

        let first = tester
            .add_points(
                &c,
                [
                    Point::new(-10.0, -10.0),
                    Point::new(20.0, -10.0),
                    Point::new(20.0, 10.0),
                ],
            )
            .unwrap();
        // The triangle holds only the last point of the low row.
        assert_eq!(first, None);

        let second = tester
            .add_points(&c, [Point::new(-10.0, 10.0)])
            .unwrap()
            .unwrap_or_default();
        assert_eq!(second.selected, [low_id]);
        assert!(!tester.selection().contains(&high_id));
        assert_eq!(tester.selection(), [low_id]);
    }

    #[test]
    fn rejects_bad_percent_and_empty_batches() {
        let mut c = StrokeCollection::new();
        assert_eq!(
            IncrementalLassoHitTester::new(&mut c, 101).err(),
            Some(InkError::PercentOutOfRange(101))
        );
        let mut tester = IncrementalLassoHitTester::new(&mut c, 50).unwrap();
        assert_eq!(
            tester.add_points(&c, core::iter::empty()),
            Err(InkError::EmptyPoints)
        );
    }

    #[test]
    fn filtered_points_change_nothing() {
        let mut c = StrokeCollection::from_strokes(vec![dot_row(0.0)]).unwrap();
        let mut tester = IncrementalLassoHitTester::new(&mut c, 50).unwrap();
        let square = [
            Point::new(-10.0, -10.0),
            Point::new(20.0, -10.0),
            Point::new(20.0, 10.0),
            Point::new(-10.0, 10.0),
        ];
        assert!(tester.add_points(&c, square).unwrap().is_some());
        assert_eq!(tester.add_point(&c, Point::new(-10.2, 10.2)), Ok(None));
    }
}

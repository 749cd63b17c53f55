// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Stroke`] type: points, drawing attributes and derived geometry.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::ptr;
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, BezPath, Point, Rect};

use crate::InkError;
use crate::attributes::{DrawingAttributes, MAX_WIDTH, MIN_WIDTH};
use crate::bezier::fit_points;
use crate::erasing::ErasingStroke;
use crate::findices::{
    StrokeFIndices, StrokeIntersection, complement, hit_segments, in_segments, normalize,
};
use crate::lasso::Lasso;
use crate::node::StrokeNodeIterator;
use crate::point::StylusPoint;
use crate::shape::StylusShape;
use crate::util::{is_invertible, linear_part, rect_contains, rects_overlap};
use crate::weights::{PointWeights, check_percent};

/// Diameter of the tip used by [`Stroke::hit_test_point`].
pub const TAP_HIT_POINT_SIZE: f64 = 1.0;

static NEXT_STROKE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a stroke.
///
/// Ids are never reused within a process. Cloning a [`Stroke`] keeps its id;
/// [`Stroke::duplicate`] and every fragment produced by clipping or erasing
/// get a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(u64);

impl StrokeId {
    fn next() -> Self {
        Self(NEXT_STROKE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Application data attached to a stroke, keyed by a 128-bit id.
///
/// The payloads are opaque bytes; they are carried along by clones,
/// duplicates and fragments but never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendedProperties {
    entries: Vec<(u128, Vec<u8>)>,
}

impl ExtendedProperties {
    /// Payload stored under `id`.
    #[must_use]
    pub fn get(&self, id: u128) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == id)
            .map(|(_, v)| v.as_slice())
    }

    /// Stores `data` under `id`, returning the previous payload.
    pub fn insert(&mut self, id: u128, data: Vec<u8>) -> Option<Vec<u8>> {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, slot)) => Some(core::mem::replace(slot, data)),
            None => {
                self.entries.push((id, data));
                None
            }
        }
    }

    /// Removes the payload stored under `id`.
    pub fn remove(&mut self, id: u128) -> Option<Vec<u8>> {
        let index = self.entries.iter().position(|(k, _)| *k == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if a payload is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: u128) -> bool {
        self.entries.iter().any(|(k, _)| *k == id)
    }

    /// Number of payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no payloads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payloads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u128, &[u8])> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// A freehand ink stroke.
///
/// A stroke owns at least one [`StylusPoint`] and one set of
/// [`DrawingAttributes`]. Its bounds, Bezier-fitted points and renderable
/// geometry are computed lazily and cached. Every change that can affect
/// them clears the caches and bumps [`revision`](Self::revision) exactly
/// once; changes that cannot (such as the color) leave both untouched, so
/// holders of cached data can compare revisions to detect staleness.
#[derive(Clone, Debug)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<StylusPoint>,
    attributes: DrawingAttributes,
    properties: ExtendedProperties,
    revision: u64,
    bounds: OnceCell<Rect>,
    fitted: OnceCell<Vec<StylusPoint>>,
    geometry: OnceCell<Arc<BezPath>>,
}

impl Stroke {
    /// Creates a stroke with default drawing attributes.
    pub fn new(points: Vec<StylusPoint>) -> Result<Self, InkError> {
        Self::with_attributes(points, DrawingAttributes::new())
    }

    /// Creates a stroke with the given drawing attributes.
    pub fn with_attributes(
        points: Vec<StylusPoint>,
        attributes: DrawingAttributes,
    ) -> Result<Self, InkError> {
        if points.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        Ok(Self::from_parts(
            points,
            attributes,
            ExtendedProperties::default(),
        ))
    }

    fn from_parts(
        points: Vec<StylusPoint>,
        attributes: DrawingAttributes,
        properties: ExtendedProperties,
    ) -> Self {
        Self {
            id: StrokeId::next(),
            points,
            attributes,
            properties,
            revision: 0,
            bounds: OnceCell::new(),
            fitted: OnceCell::new(),
            geometry: OnceCell::new(),
        }
    }

    /// Copies this stroke under a fresh identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: StrokeId::next(),
            ..self.clone()
        }
    }

    /// Identity of this stroke.
    #[must_use]
    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Captured points.
    #[must_use]
    pub fn points(&self) -> &[StylusPoint] {
        &self.points
    }

    /// Drawing attributes.
    #[must_use]
    pub fn drawing_attributes(&self) -> &DrawingAttributes {
        &self.attributes
    }

    /// Extended properties.
    #[must_use]
    pub fn extended_properties(&self) -> &ExtendedProperties {
        &self.properties
    }

    /// Mutable extended properties; these never affect geometry.
    pub fn extended_properties_mut(&mut self) -> &mut ExtendedProperties {
        &mut self.properties
    }

    /// Counter bumped by every geometry-relevant change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.bounds.take();
        self.fitted.take();
        self.geometry.take();
    }

    /// Replaces the points. An empty sequence is rejected.
    pub fn set_points(&mut self, points: Vec<StylusPoint>) -> Result<(), InkError> {
        if points.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        self.points = points;
        self.invalidate();
        Ok(())
    }

    /// Appends points. An empty batch is rejected.
    pub fn add_points(&mut self, points: &[StylusPoint]) -> Result<(), InkError> {
        if points.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        self.points.extend_from_slice(points);
        self.invalidate();
        Ok(())
    }

    /// Replaces the drawing attributes.
    ///
    /// Caches survive if the new attributes are geometrically equal.
    pub fn set_drawing_attributes(&mut self, attributes: DrawingAttributes) {
        let geometric = self.attributes.is_geometrically_equal(&attributes);
        self.attributes = attributes;
        if !geometric {
            self.invalidate();
        }
    }

    /// Edits the drawing attributes in place.
    ///
    /// Caches survive if the edit leaves the attributes geometrically equal.
    pub fn update_drawing_attributes<R>(
        &mut self,
        f: impl FnOnce(&mut DrawingAttributes) -> R,
    ) -> R {
        let before = self.attributes;
        let result = f(&mut self.attributes);
        if !before.is_geometrically_equal(&self.attributes) {
            self.invalidate();
        }
        result
    }

    /// Applies `transform` to every point.
    ///
    /// Identity is a no-op. Transforms with non-finite coefficients or no
    /// inverse are rejected. With `apply_to_tip`, the linear part of
    /// `transform` is also composed into the tip transform; if the composed
    /// tip transform would not be invertible it is dropped and the points are
    /// still transformed.
    pub fn transform(&mut self, transform: Affine, apply_to_tip: bool) -> Result<(), InkError> {
        if !is_invertible(&transform) {
            return Err(InkError::NonInvertibleTransform);
        }
        if transform == Affine::IDENTITY {
            return Ok(());
        }
        for sample in &mut self.points {
            sample.position = transform * sample.position;
        }
        if apply_to_tip {
            let tip = linear_part(transform) * self.attributes.stylus_tip_transform();
            if self.attributes.set_stylus_tip_transform(tip).is_err() {
                log::debug!(
                    "stroke {:?}: discarding non-invertible tip transform {:?}",
                    self.id,
                    tip.as_coeffs()
                );
            }
        }
        self.invalidate();
        Ok(())
    }

    /// Bezier fit of the points using the stroke's fitting error.
    ///
    /// Falls back to a copy of the points when no curve can be fitted.
    #[must_use]
    pub fn bezier_points(&self) -> Vec<StylusPoint> {
        fit_points(
            &self.points,
            self.attributes.fitting_error(),
            self.attributes.stylus_shape().bounding_box(),
        )
    }

    /// The points geometry is built from: the Bezier fit when
    /// [`fit_to_curve`](DrawingAttributes::fit_to_curve) is set, the raw
    /// points otherwise.
    #[must_use]
    pub fn effective_points(&self) -> &[StylusPoint] {
        if self.attributes.fit_to_curve() {
            self.fitted.get_or_init(|| self.bezier_points())
        } else {
            &self.points
        }
    }

    fn effective_positions(&self) -> Vec<Point> {
        self.effective_points().iter().map(|s| s.position).collect()
    }

    /// Nodes of the effective points under the stroke's own attributes.
    #[must_use]
    pub fn nodes(&self) -> StrokeNodeIterator<'_> {
        StrokeNodeIterator::new(self.effective_points(), &self.attributes)
    }

    /// Union of the bounds of every node.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        *self.bounds.get_or_init(|| {
            self.nodes()
                .map(|node| node.bounds())
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO)
        })
    }

    /// Weights of the effective points.
    #[must_use]
    pub fn point_weights(&self) -> PointWeights {
        PointWeights::new(
            &self.effective_positions(),
            self.attributes.stylus_shape().bounding_box(),
        )
    }

    fn tap_hit(&self, point: Point, diameter: f64) -> bool {
        let eraser = ErasingStroke::new(&StylusShape::ellipse(diameter, diameter), [point]);
        match eraser.bounds() {
            Some(b) if rects_overlap(b, self.bounds()) => eraser.hit_test(self.nodes()),
            _ => false,
        }
    }

    /// Returns `true` if a tap of [`TAP_HIT_POINT_SIZE`] at `point` touches the ink.
    #[must_use]
    pub fn hit_test_point(&self, point: Point) -> bool {
        self.tap_hit(point, TAP_HIT_POINT_SIZE)
    }

    /// Returns `true` if a circular tap of `diameter` at `point` touches the ink.
    pub fn hit_test_point_with_diameter(
        &self,
        point: Point,
        diameter: f64,
    ) -> Result<bool, InkError> {
        if !diameter.is_finite() || !(MIN_WIDTH..=MAX_WIDTH).contains(&diameter) {
            return Err(InkError::InvalidDiameter(diameter));
        }
        Ok(self.tap_hit(point, diameter))
    }

    /// Returns `true` if at least `percent` of the stroke's weight lies in `rect`.
    pub fn hit_test_rect(&self, rect: Rect, percent: u32) -> Result<bool, InkError> {
        check_percent(percent)?;
        if percent == 0 {
            return Ok(true);
        }
        if !rects_overlap(rect, self.bounds()) {
            return Ok(false);
        }
        let weights = self.point_weights();
        let inside = weights.weight_where(&self.effective_positions(), |p| rect_contains(rect, p));
        Ok(weights.is_hit(inside, percent))
    }

    /// Returns `true` if at least `percent` of the stroke's weight lies in the
    /// lasso through `lasso_points`.
    ///
    /// The lasso is built as a [single loop](Lasso::single_loop), the same
    /// region an incremental selection over the same points ends up with.
    pub fn hit_test_lasso(&self, lasso_points: &[Point], percent: u32) -> Result<bool, InkError> {
        self.hit_test_lasso_region(&selection_lasso_from(lasso_points)?, percent)
    }

    /// Weighted hit test against an already built lasso.
    pub fn hit_test_lasso_region(&self, lasso: &Lasso, percent: u32) -> Result<bool, InkError> {
        check_percent(percent)?;
        if percent == 0 {
            return Ok(true);
        }
        match lasso.bounds() {
            Some(b) if !lasso.is_empty() && rects_overlap(b, self.bounds()) => {}
            _ => return Ok(false),
        }
        let weights = self.point_weights();
        let inside = weights.weight_where(&self.effective_positions(), |p| lasso.contains(p));
        Ok(weights.is_hit(inside, percent))
    }

    /// Returns `true` if `shape` swept along `path` touches the ink.
    pub fn hit_test_path(&self, path: &[Point], shape: &StylusShape) -> Result<bool, InkError> {
        if path.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        let eraser = ErasingStroke::new(shape, path.iter().copied());
        Ok(match eraser.bounds() {
            Some(b) if rects_overlap(b, self.bounds()) => eraser.hit_test(self.nodes()),
            _ => false,
        })
    }

    /// Where the centerline runs inside `lasso`.
    #[must_use]
    pub fn lasso_intersections(&self, lasso: &Lasso) -> Vec<StrokeIntersection> {
        lasso.hit_test_points(&self.effective_positions())
    }

    /// Where `eraser` covers the ink.
    #[must_use]
    pub fn erase_test(&self, eraser: &ErasingStroke) -> Vec<StrokeIntersection> {
        match eraser.bounds() {
            Some(b) if rects_overlap(b, self.bounds()) => eraser.erase_test(self.nodes()),
            _ => Vec::new(),
        }
    }

    /// Fragments inside `rect`.
    #[must_use]
    pub fn clip_result_rect(&self, rect: Rect) -> Vec<Self> {
        self.clip_at(&in_segments(&self.lasso_intersections(&Lasso::from_rect(rect))))
    }

    /// Fragments inside the lasso through `lasso_points`.
    pub fn clip_result_lasso(&self, lasso_points: &[Point]) -> Result<Vec<Self>, InkError> {
        let lasso = lasso_from(lasso_points)?;
        Ok(self.clip_at(&in_segments(&self.lasso_intersections(&lasso))))
    }

    /// Fragments outside `rect`.
    #[must_use]
    pub fn erase_result_rect(&self, rect: Rect) -> Vec<Self> {
        self.erase_at(&in_segments(&self.lasso_intersections(&Lasso::from_rect(rect))))
    }

    /// Fragments outside the lasso through `lasso_points`.
    pub fn erase_result_lasso(&self, lasso_points: &[Point]) -> Result<Vec<Self>, InkError> {
        let lasso = lasso_from(lasso_points)?;
        Ok(self.erase_at(&in_segments(&self.lasso_intersections(&lasso))))
    }

    /// Fragments left after erasing with `shape` swept along `path`.
    pub fn erase_result_path(
        &self,
        path: &[Point],
        shape: &StylusShape,
    ) -> Result<Vec<Self>, InkError> {
        if path.is_empty() {
            return Err(InkError::EmptyPoints);
        }
        let eraser = ErasingStroke::new(shape, path.iter().copied());
        Ok(self.erase_at(&hit_segments(&self.erase_test(&eraser))))
    }

    fn last_index(&self) -> f64 {
        (self.effective_points().len() - 1) as f64
    }

    /// One fragment per interval of `ranges`.
    ///
    /// Ranges are in fractional indices over [`effective_points`](Self::effective_points).
    /// A single range covering the whole stroke yields a duplicate of it.
    #[must_use]
    pub fn clip_at(&self, ranges: &[StrokeFIndices]) -> Vec<Self> {
        let ranges = normalize(ranges, self.last_index());
        if matches!(ranges.as_slice(), [only] if only.is_full()) {
            return vec![self.duplicate()];
        }
        ranges.iter().filter_map(|r| self.copy_range(*r)).collect()
    }

    /// One fragment per gap between the intervals of `ranges`.
    ///
    /// With nothing to erase the result is a duplicate of the whole stroke.
    #[must_use]
    pub fn erase_at(&self, ranges: &[StrokeFIndices]) -> Vec<Self> {
        let gaps = complement(&normalize(ranges, self.last_index()));
        if matches!(gaps.as_slice(), [only] if only.is_full()) {
            return vec![self.duplicate()];
        }
        gaps.iter().filter_map(|r| self.copy_range(*r)).collect()
    }

    /// Copies the effective points covered by `range` into a new stroke.
    ///
    /// The first and last positions are interpolated at the fractional ends.
    fn copy_range(&self, range: StrokeFIndices) -> Option<Self> {
        let points = self.effective_points();
        let last = points.len() - 1;
        let (begin, end) = range.resolve(last as f64);
        if last > 0 && begin >= end {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "indices are clamped to the point range"
        )]
        let (first, final_index) = (begin.floor() as usize, (end.ceil() as usize).min(last));
        let mut out = points[first..=final_index].to_vec();

        let lead = begin - begin.floor();
        if lead > 0.0 {
            out[0].position = points[first].position.lerp(points[first + 1].position, lead);
        }
        let tail = end - end.floor();
        if tail > 0.0 {
            let k = final_index - 1;
            if let Some(sample) = out.last_mut() {
                sample.position = points[k].position.lerp(points[k + 1].position, tail);
            }
        }

        let mut attributes = self.attributes;
        attributes.set_fit_to_curve(false);
        Some(Self::from_parts(out, attributes, self.properties.clone()))
    }

    /// Renderable outline of the stroke under its own attributes.
    #[must_use]
    pub fn geometry(&self) -> Arc<BezPath> {
        self.geometry_with(&self.attributes)
    }

    /// Renderable outline of the stroke under `attributes`.
    ///
    /// The result is cached only when `attributes` is the stroke's own
    /// instance; the cache is reused for any geometrically equal attributes.
    #[must_use]
    pub fn geometry_with(&self, attributes: &DrawingAttributes) -> Arc<BezPath> {
        if let Some(cached) = self
            .geometry
            .get()
            .filter(|_| attributes.is_geometrically_equal(&self.attributes))
        {
            return cached.clone();
        }
        if ptr::eq(attributes, &self.attributes) {
            return self
                .geometry
                .get_or_init(|| Arc::new(outline(self.nodes())))
                .clone();
        }
        let fitted;
        let points = if attributes.fit_to_curve() {
            fitted = fit_points(
                &self.points,
                attributes.fitting_error(),
                attributes.stylus_shape().bounding_box(),
            );
            fitted.as_slice()
        } else {
            self.points.as_slice()
        };
        Arc::new(outline(StrokeNodeIterator::new(points, attributes)))
    }
}

/// A plain lasso through `points`, which must not be empty.
pub(crate) fn lasso_from(points: &[Point]) -> Result<Lasso, InkError> {
    build_lasso(Lasso::new(), points)
}

/// A single-loop lasso through `points`, which must not be empty.
pub(crate) fn selection_lasso_from(points: &[Point]) -> Result<Lasso, InkError> {
    build_lasso(Lasso::single_loop(), points)
}

fn build_lasso(mut lasso: Lasso, points: &[Point]) -> Result<Lasso, InkError> {
    if points.is_empty() {
        return Err(InkError::EmptyPoints);
    }
    lasso.add_points(points.iter().copied());
    Ok(lasso)
}

/// One closed subpath per node contour.
fn outline(nodes: StrokeNodeIterator<'_>) -> BezPath {
    let mut path = BezPath::new();
    for node in nodes {
        let contour = node.contour();
        let Some((first, rest)) = contour.split_first() else {
            continue;
        };
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::stylus_points_from;
    use peniko::Color;

    fn line(n: usize) -> Stroke {
        Stroke::new(stylus_points_from((0..n).map(|i| (i as f64 * 10.0, 0.0)))).unwrap()
    }

    #[test]
    fn empty_points_are_rejected() {
        assert_eq!(Stroke::new(Vec::new()).err(), Some(InkError::EmptyPoints));
        let mut s = line(2);
        assert_eq!(s.set_points(Vec::new()), Err(InkError::EmptyPoints));
        assert_eq!(s.points().len(), 2);
    }

    #[test]
    fn clone_keeps_identity_and_duplicate_does_not() {
        let s = line(3);
        assert_eq!(s.clone().id(), s.id());
        assert_ne!(s.duplicate().id(), s.id());
    }

    #[test]
    fn bounds_are_stable_and_invalidated_by_points() {
        let mut s = line(2);
        let b = s.bounds();
        assert_eq!(b, s.bounds());
        s.add_points(&[StylusPoint::new(50.0, 0.0)]).unwrap();
        assert!(s.bounds().x1 > b.x1);
    }

    #[test]
    fn color_change_keeps_cached_geometry() {
        let mut s = line(4);
        let before = s.geometry();
        let revision = s.revision();
        s.update_drawing_attributes(|da| da.set_color(Color::from_rgba8(255, 0, 0, 255)));
        assert!(Arc::ptr_eq(&before, &s.geometry()));
        assert_eq!(s.revision(), revision);

        s.update_drawing_attributes(|da| da.set_width(6.0)).unwrap();
        assert!(!Arc::ptr_eq(&before, &s.geometry()));
        assert_eq!(s.revision(), revision + 1);
    }

    #[test]
    fn foreign_attributes_are_not_cached() {
        let s = line(3);
        let mut other = *s.drawing_attributes();
        other.set_width(8.0).unwrap();
        let wide = s.geometry_with(&other);
        let own = s.geometry();
        assert!(!Arc::ptr_eq(&wide, &own));
        assert!(Arc::ptr_eq(&own, &s.geometry()));
    }

    #[test]
    fn transform_invalidates_once_and_rejects_singular() {
        let mut s = line(3);
        let revision = s.revision();
        s.transform(Affine::scale(2.0), true).unwrap();
        assert_eq!(s.revision(), revision + 1);
        assert_eq!(s.points()[2].position, Point::new(40.0, 0.0));
        assert_eq!(s.drawing_attributes().stylus_tip_transform(), Affine::scale(2.0));

        assert_eq!(
            s.transform(Affine::scale_non_uniform(1.0, 0.0), false),
            Err(InkError::NonInvertibleTransform)
        );
        s.transform(Affine::IDENTITY, true).unwrap();
        assert_eq!(s.revision(), revision + 1);
    }

    #[test]
    fn tip_transform_underflow_is_dropped_silently() {
        let mut s = line(2);
        s.transform(Affine::scale(1e-5), true).unwrap();
        s.transform(Affine::scale(1e-5), true).unwrap();
        assert_eq!(
            s.drawing_attributes().stylus_tip_transform(),
            Affine::scale(1e-5)
        );
        assert!(s.points()[1].position.x < 1e-8);
    }

    #[test]
    fn clip_at_interpolates_ends() {
        let s = line(5);
        let parts = s.clip_at(&[StrokeFIndices::new(0.5, 2.25)]);
        assert_eq!(parts.len(), 1);
        let pts: Vec<_> = parts[0].points().iter().map(|p| p.position.x).collect();
        assert_eq!(pts, [5.0, 10.0, 20.0, 22.5]);
        assert!(!parts[0].drawing_attributes().fit_to_curve());
    }

    #[test]
    fn erase_at_keeps_gaps() {
        let s = line(5);
        let parts = s.erase_at(&[StrokeFIndices::new(1.5, 2.5)]);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].points().len(), 3);
        assert_eq!(parts[0].points()[2].position.x, 15.0);
        assert_eq!(parts[1].points()[0].position.x, 25.0);
        assert_eq!(parts[1].points().len(), 3);
    }

    #[test]
    fn nothing_to_erase_returns_a_duplicate() {
        let s = line(5);
        let parts = s.erase_at(&[]);
        assert_eq!(parts.len(), 1);
        assert_ne!(parts[0].id(), s.id());
        assert_eq!(parts[0].points(), s.points());
        assert!(s.clip_at(&[]).is_empty());
    }

    #[test]
    fn invalid_diameter_is_rejected() {
        let s = line(2);
        assert!(matches!(
            s.hit_test_point_with_diameter(Point::ZERO, f64::NAN),
            Err(InkError::InvalidDiameter(_))
        ));
        assert!(matches!(
            s.hit_test_point_with_diameter(Point::ZERO, -1.0),
            Err(InkError::InvalidDiameter(_))
        ));
        assert_eq!(s.hit_test_point_with_diameter(Point::ZERO, 2.0), Ok(true));
    }
}

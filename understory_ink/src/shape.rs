// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stylus shapes: the contour of a pen tip or eraser.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::attributes::{DrawingAttributes, StylusTip};
use crate::util::{bounds_of, linear_part, signed_area};

/// Number of vertices used to approximate an elliptical outline.
pub const ELLIPSE_VERTEX_COUNT: usize = 16;

/// Convex outline vertices of a tip, relative to its center.
pub type ShapeVertices = SmallVec<[Vec2; ELLIPSE_VERTEX_COUNT]>;

/// The outline of a pen tip or erasing tool.
///
/// A shape is an ellipse or rectangle of the given size, rotated by
/// `rotation` degrees and then mapped by a linear `transform`. Shapes with a
/// non-positive or non-finite size are *empty*: they have no vertices and
/// never hit anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StylusShape {
    tip: StylusTip,
    width: f64,
    height: f64,
    rotation: f64,
    transform: Affine,
}

fn sanitize(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        0.0
    }
}

impl StylusShape {
    /// Creates a shape; `rotation` is in degrees.
    #[must_use]
    pub fn new(tip: StylusTip, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            tip,
            width: sanitize(width),
            height: sanitize(height),
            rotation: if rotation.is_finite() { rotation } else { 0.0 },
            transform: Affine::IDENTITY,
        }
    }

    /// Creates an unrotated elliptical shape.
    #[must_use]
    pub fn ellipse(width: f64, height: f64) -> Self {
        Self::new(StylusTip::Ellipse, width, height, 0.0)
    }

    /// Creates an unrotated rectangular shape.
    #[must_use]
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(StylusTip::Rectangle, width, height, 0.0)
    }

    /// The tip outline of `attributes`, including its tip transform.
    #[must_use]
    pub fn from_drawing_attributes(attributes: &DrawingAttributes) -> Self {
        Self::new(
            attributes.stylus_tip(),
            attributes.width(),
            attributes.height(),
            0.0,
        )
        .with_transform(attributes.stylus_tip_transform())
    }

    /// Returns this shape with an additional linear transform.
    ///
    /// Any translation in `transform` is ignored.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = linear_part(transform);
        self
    }

    /// Outline kind.
    #[must_use]
    pub fn tip(&self) -> StylusTip {
        self.tip
    }

    /// Width before rotation and transform.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height before rotation and transform.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Returns `true` if the shape has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Returns `true` for elliptical shapes.
    #[must_use]
    pub fn is_ellipse(&self) -> bool {
        self.tip == StylusTip::Ellipse
    }

    /// Counter-clockwise outline vertices relative to the shape center.
    ///
    /// Ellipses are approximated by [`ELLIPSE_VERTEX_COUNT`] vertices.
    #[must_use]
    pub fn vertices(&self) -> ShapeVertices {
        let mut out = ShapeVertices::new();
        if self.is_empty() {
            return out;
        }
        let (rx, ry) = (self.width * 0.5, self.height * 0.5);
        match self.tip {
            StylusTip::Rectangle => {
                out.extend([
                    Vec2::new(-rx, -ry),
                    Vec2::new(rx, -ry),
                    Vec2::new(rx, ry),
                    Vec2::new(-rx, ry),
                ]);
            }
            StylusTip::Ellipse => {
                for k in 0..ELLIPSE_VERTEX_COUNT {
                    let angle = 2.0 * PI * (k as f64) / (ELLIPSE_VERTEX_COUNT as f64);
                    out.push(Vec2::new(rx * angle.cos(), ry * angle.sin()));
                }
            }
        }

        let linear = self.transform * Affine::rotate(self.rotation * PI / 180.0);
        if linear != Affine::IDENTITY {
            for v in &mut out {
                *v = (linear * v.to_point()).to_vec2();
            }
        }

        let as_points: SmallVec<[Point; ELLIPSE_VERTEX_COUNT]> =
            out.iter().map(|v| v.to_point()).collect();
        if signed_area(&as_points) < 0.0 {
            out.reverse();
        }
        out
    }

    /// Axis-aligned bounds of the outline, centered on the origin.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        bounds_of(self.vertices().iter().map(|v| v.to_point())).unwrap_or(Rect::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_bounds_match_size() {
        let shape = StylusShape::rectangle(4.0, 2.0);
        assert_eq!(shape.bounding_box(), Rect::new(-2.0, -1.0, 2.0, 1.0));
    }

    #[test]
    fn rotated_rectangle_swaps_extent() {
        let shape = StylusShape::new(StylusTip::Rectangle, 4.0, 2.0, 90.0);
        let bounds = shape.bounding_box();
        assert!((bounds.width() - 2.0).abs() < 1e-9);
        assert!((bounds.height() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn mirrored_shape_stays_counter_clockwise() {
        let shape =
            StylusShape::ellipse(3.0, 1.0).with_transform(Affine::scale_non_uniform(-1.0, 1.0));
        let points: SmallVec<[Point; 16]> =
            shape.vertices().iter().map(|v| v.to_point()).collect();
        assert!(signed_area(&points) > 0.0);
    }

    #[test]
    fn degenerate_sizes_are_empty() {
        assert!(StylusShape::ellipse(0.0, 2.0).is_empty());
        assert!(StylusShape::rectangle(f64::NAN, 2.0).vertices().is_empty());
        assert_eq!(StylusShape::ellipse(-1.0, -1.0).bounding_box(), Rect::ZERO);
    }
}

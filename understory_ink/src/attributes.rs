// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing attributes: the per-stroke tip and rendering description.

use kurbo::Affine;
use peniko::Color;

use crate::InkError;
use crate::shape::StylusShape;
use crate::util::is_invertible;

/// Default tip width and height (three points at 96 DPI, in DIPs).
pub const DEFAULT_TIP_SIZE: f64 = 2.003_149_606_299_212_7;

/// Smallest accepted tip width.
pub const MIN_WIDTH: f64 = f64::MIN_POSITIVE;
/// Largest accepted tip width.
pub const MAX_WIDTH: f64 = 162_754.2;
/// Smallest accepted tip height.
pub const MIN_HEIGHT: f64 = f64::MIN_POSITIVE;
/// Largest accepted tip height.
pub const MAX_HEIGHT: f64 = 162_754.2;

/// Default curve fitting error, in stroke units.
pub const DEFAULT_FITTING_ERROR: f64 = 0.5;

/// Outline of the pen tip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StylusTip {
    /// Elliptical tip.
    #[default]
    Ellipse,
    /// Rectangular tip.
    Rectangle,
}

bitflags::bitflags! {
    /// Geometry-affecting rendering switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DrawingFlags: u8 {
        /// Render and hit test a Bezier fit of the points instead of the raw polyline.
        const FIT_TO_CURVE    = 0b0000_0001;
        /// Treat every sample as having default pressure.
        const IGNORE_PRESSURE = 0b0000_0010;
    }
}

/// How a stroke is drawn: color, tip size and shape, tip transform and flags.
///
/// Only a subset of these fields affects a stroke's shape; see
/// [`DrawingAttributes::is_geometrically_equal`]. Changing color or the
/// highlighter flag never invalidates cached geometry.
#[derive(Clone, Copy, Debug)]
pub struct DrawingAttributes {
    color: Color,
    width: f64,
    height: f64,
    stylus_tip: StylusTip,
    stylus_tip_transform: Affine,
    flags: DrawingFlags,
    is_highlighter: bool,
    fitting_error: f64,
}

impl Default for DrawingAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DrawingAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.is_geometrically_equal(other)
            && self.is_highlighter == other.is_highlighter
            && self.color.to_rgba8().to_u8_array() == other.color.to_rgba8().to_u8_array()
    }
}

impl DrawingAttributes {
    /// Creates the default attributes: black, elliptical [`DEFAULT_TIP_SIZE`] tip.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: Color::from_rgba8(0, 0, 0, 255),
            width: DEFAULT_TIP_SIZE,
            height: DEFAULT_TIP_SIZE,
            stylus_tip: StylusTip::Ellipse,
            stylus_tip_transform: Affine::IDENTITY,
            flags: DrawingFlags::empty(),
            is_highlighter: false,
            fitting_error: DEFAULT_FITTING_ERROR,
        }
    }

    /// Stroke color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Tip width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the tip width, clamped into [`MIN_WIDTH`]..=[`MAX_WIDTH`].
    pub fn set_width(&mut self, width: f64) -> Result<(), InkError> {
        if width.is_nan() {
            return Err(InkError::InvalidSize(width));
        }
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        Ok(())
    }

    /// Tip height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sets the tip height, clamped into [`MIN_HEIGHT`]..=[`MAX_HEIGHT`].
    pub fn set_height(&mut self, height: f64) -> Result<(), InkError> {
        if height.is_nan() {
            return Err(InkError::InvalidSize(height));
        }
        self.height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        Ok(())
    }

    /// Tip outline.
    #[must_use]
    pub fn stylus_tip(&self) -> StylusTip {
        self.stylus_tip
    }

    /// Sets the tip outline.
    pub fn set_stylus_tip(&mut self, tip: StylusTip) {
        self.stylus_tip = tip;
    }

    /// Linear transform applied to the tip outline.
    #[must_use]
    pub fn stylus_tip_transform(&self) -> Affine {
        self.stylus_tip_transform
    }

    /// Sets the tip transform.
    ///
    /// The transform must be invertible and must not translate.
    pub fn set_stylus_tip_transform(&mut self, transform: Affine) -> Result<(), InkError> {
        if !is_invertible(&transform) {
            return Err(InkError::NonInvertibleTransform);
        }
        let t = transform.translation();
        if t.x != 0.0 || t.y != 0.0 {
            return Err(InkError::TipTransformHasTranslation);
        }
        self.stylus_tip_transform = transform;
        Ok(())
    }

    /// Geometry flags.
    #[must_use]
    pub fn flags(&self) -> DrawingFlags {
        self.flags
    }

    /// Returns `true` if strokes are drawn from a Bezier fit of their points.
    #[must_use]
    pub fn fit_to_curve(&self) -> bool {
        self.flags.contains(DrawingFlags::FIT_TO_CURVE)
    }

    /// Enables or disables Bezier fitting.
    pub fn set_fit_to_curve(&mut self, fit: bool) {
        self.flags.set(DrawingFlags::FIT_TO_CURVE, fit);
    }

    /// Returns `true` if pressure is ignored when sizing the tip.
    #[must_use]
    pub fn ignore_pressure(&self) -> bool {
        self.flags.contains(DrawingFlags::IGNORE_PRESSURE)
    }

    /// Enables or disables pressure sensitivity.
    pub fn set_ignore_pressure(&mut self, ignore: bool) {
        self.flags.set(DrawingFlags::IGNORE_PRESSURE, ignore);
    }

    /// Returns `true` for highlighter ink.
    #[must_use]
    pub fn is_highlighter(&self) -> bool {
        self.is_highlighter
    }

    /// Marks the ink as highlighter ink.
    pub fn set_highlighter(&mut self, highlighter: bool) {
        self.is_highlighter = highlighter;
    }

    /// Maximum deviation allowed when fitting Bezier curves to the points.
    #[must_use]
    pub fn fitting_error(&self) -> f64 {
        self.fitting_error
    }

    /// Sets the curve fitting error; it must be finite and non-negative.
    pub fn set_fitting_error(&mut self, error: f64) -> Result<(), InkError> {
        if !error.is_finite() || error < 0.0 {
            return Err(InkError::InvalidFittingError(error));
        }
        self.fitting_error = error;
        Ok(())
    }

    /// Returns the tip outline described by these attributes.
    #[must_use]
    pub fn stylus_shape(&self) -> StylusShape {
        StylusShape::from_drawing_attributes(self)
    }

    /// Compares only the fields that change a stroke's shape.
    ///
    /// These are the tip size, outline and transform, the
    /// [`DrawingFlags`], and the fitting error.
    #[must_use]
    pub fn is_geometrically_equal(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.stylus_tip == other.stylus_tip
            && self.stylus_tip_transform == other.stylus_tip_transform
            && self.flags == other.flags
            && self.fitting_error == other.fitting_error
    }
}

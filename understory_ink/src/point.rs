// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stylus point samples.

use kurbo::Point;
use smallvec::SmallVec;

/// Pressure reported for samples captured without pressure information.
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// A single captured pen sample.
///
/// Besides position and normalized pressure a sample may carry additional
/// per-point channels (tilt, timestamps, ...). The curve fitter interpolates
/// every channel alongside pressure; nothing else interprets them.
#[derive(Clone, Debug, PartialEq)]
pub struct StylusPoint {
    /// Position in stroke coordinates.
    pub position: Point,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f32,
    /// Auxiliary channels, interpolated like pressure.
    pub extra: SmallVec<[f32; 2]>,
}

impl StylusPoint {
    /// Creates a sample at `(x, y)` with [`DEFAULT_PRESSURE`].
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_pressure(x, y, DEFAULT_PRESSURE)
    }

    /// Creates a sample with an explicit pressure, clamped to `[0, 1]`.
    ///
    /// A NaN pressure is replaced by [`DEFAULT_PRESSURE`].
    #[must_use]
    pub fn with_pressure(x: f64, y: f64, pressure: f32) -> Self {
        let pressure = if pressure.is_nan() {
            DEFAULT_PRESSURE
        } else {
            pressure.clamp(0.0, 1.0)
        };
        Self {
            position: Point::new(x, y),
            pressure,
            extra: SmallVec::new(),
        }
    }

    /// Returns this sample with the given auxiliary channels.
    #[must_use]
    pub fn with_extra(mut self, extra: &[f32]) -> Self {
        self.extra = SmallVec::from_slice(extra);
        self
    }

    /// Returns the geometric scale factor this sample applies to the tip.
    ///
    /// Default pressure maps to a factor of `1`.
    #[must_use]
    pub fn pressure_factor(&self) -> f64 {
        f64::from(self.pressure) * 2.0
    }
}

impl From<Point> for StylusPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Converts plain positions into samples with default pressure.
pub fn stylus_points_from<I>(points: I) -> alloc::vec::Vec<StylusPoint>
where
    I: IntoIterator,
    I::Item: Into<Point>,
{
    points
        .into_iter()
        .map(|p| StylusPoint::from(p.into()))
        .collect()
}

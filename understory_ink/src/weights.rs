// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-point weights for "percent of the stroke inside a region" tests.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::InkError;

/// Slack subtracted from weighted hit thresholds to absorb rounding.
pub const PERCENTAGE_TOLERANCE: f64 = 1e-4;

/// Validates a `percent_within` argument.
pub fn check_percent(percent: u32) -> Result<(), InkError> {
    if percent > 100 {
        Err(InkError::PercentOutOfRange(percent))
    } else {
        Ok(())
    }
}

/// Arc-length-like weights of a stroke's points.
///
/// Each point weighs half the distance to its previous neighbor plus half
/// the distance to its next one. A missing neighbor at either end is replaced
/// by half the tip's diagonal, so endpoints carry the ink that extends past
/// them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointWeights {
    weights: Vec<f64>,
    total: f64,
}

impl PointWeights {
    /// Weights of `points` for a tip with the given bounds.
    #[must_use]
    pub fn new(points: &[Point], tip_bounds: Rect) -> Self {
        let pad = tip_bounds.width().hypot(tip_bounds.height()) * 0.5;
        let pad = if pad.is_finite() { pad } else { 0.0 };
        let n = points.len();
        let mut weights = Vec::with_capacity(n);
        for i in 0..n {
            let before = if i == 0 {
                pad
            } else {
                points[i].distance(points[i - 1]) * 0.5
            };
            let after = if i + 1 == n {
                pad
            } else {
                points[i].distance(points[i + 1]) * 0.5
            };
            weights.push(before + after);
        }
        let total = weights.iter().sum();
        Self { weights, total }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Weight of point `index`, or zero past the end.
    #[must_use]
    pub fn weight(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    /// Number of weighted points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All weights, in point order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Inside weight needed for a hit at `percent`.
    ///
    /// Percentages above 100 saturate; validate with [`check_percent`] first.
    #[must_use]
    pub fn threshold(&self, percent: u32) -> f64 {
        self.total * f64::from(percent.min(100)) / 100.0 - PERCENTAGE_TOLERANCE
    }

    /// Whether `inside` weight is a hit at `percent`.
    ///
    /// A zero percentage is always a hit.
    #[must_use]
    pub fn is_hit(&self, inside: f64, percent: u32) -> bool {
        percent == 0 || inside >= self.threshold(percent)
    }

    /// Sum of the weights of the points accepted by `inside`.
    #[must_use]
    pub fn weight_where(&self, points: &[Point], mut inside: impl FnMut(Point) -> bool) -> f64 {
        points
            .iter()
            .zip(&self.weights)
            .filter(|(p, _)| inside(**p))
            .map(|(_, w)| *w)
            .sum()
    }
}

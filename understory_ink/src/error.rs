// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for precondition violations.

use core::fmt;

use crate::StrokeId;

/// Precondition violations reported by ink operations.
///
/// Degenerate geometry (an empty lasso, a zero-length erase path, a single
/// point handed to the curve fitter) is never an error; those cases have
/// defined fallback results instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InkError {
    /// A stroke, lasso or point batch required at least one point.
    EmptyPoints,
    /// A `percent_within` argument was outside `0..=100`.
    PercentOutOfRange(u32),
    /// A tap diameter was non-finite or outside the supported tip size range.
    InvalidDiameter(f64),
    /// A tip width or height was NaN.
    InvalidSize(f64),
    /// A curve fitting error was negative or non-finite.
    InvalidFittingError(f64),
    /// An affine transform contained NaN/infinity or had no inverse.
    NonInvertibleTransform,
    /// A stylus tip transform carried a translation component.
    TipTransformHasTranslation,
    /// The stroke is already a member of the collection.
    DuplicateStroke(StrokeId),
    /// The stroke is not a member of the collection.
    StrokeNotFound(StrokeId),
    /// An insertion index was past the end of the collection.
    IndexOutOfRange(usize),
    /// An incremental hit tester was used after its session ended.
    HitTesterEnded,
    /// The hit tester was driven with a collection it was not created for.
    ForeignCollection,
}

impl fmt::Display for InkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPoints => write!(f, "at least one point is required"),
            Self::PercentOutOfRange(percent) => {
                write!(f, "percentage {percent} is outside the range 0..=100")
            }
            Self::InvalidDiameter(diameter) => write!(f, "invalid tap diameter {diameter}"),
            Self::InvalidSize(size) => write!(f, "invalid tip size {size}"),
            Self::InvalidFittingError(error) => write!(f, "invalid fitting error {error}"),
            Self::NonInvertibleTransform => {
                write!(f, "transform is not invertible or has non-finite components")
            }
            Self::TipTransformHasTranslation => {
                write!(f, "stylus tip transform must not contain a translation")
            }
            Self::DuplicateStroke(id) => write!(f, "{id:?} is already in the collection"),
            Self::StrokeNotFound(id) => write!(f, "{id:?} is not in the collection"),
            Self::IndexOutOfRange(index) => write!(f, "index {index} is out of range"),
            Self::HitTesterEnded => write!(f, "hit testing has already ended"),
            Self::ForeignCollection => {
                write!(f, "hit tester used with a collection it was not created for")
            }
        }
    }
}

impl core::error::Error for InkError {}

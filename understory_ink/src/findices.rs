// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fractional-index intervals over a stroke's points.
//!
//! A fractional index `i + t` addresses the position `t` of the way from
//! point `i` to point `i + 1`. Intervals that reach the ends of a stroke use
//! the sentinels [`StrokeFIndices::BEFORE_FIRST`] and
//! [`StrokeFIndices::AFTER_LAST`] so that "everything up to here" stays
//! distinguishable from "starting exactly at point 0".

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A closed interval `[begin, end]` of fractional point indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeFIndices {
    /// First covered fractional index.
    pub begin: f64,
    /// Last covered fractional index.
    pub end: f64,
}

impl StrokeFIndices {
    /// Sentinel for "before the first point".
    pub const BEFORE_FIRST: f64 = f64::MIN;
    /// Sentinel for "after the last point".
    pub const AFTER_LAST: f64 = f64::MAX;
    /// The whole stroke.
    pub const FULL: Self = Self {
        begin: Self::BEFORE_FIRST,
        end: Self::AFTER_LAST,
    };
    /// No part of the stroke.
    pub const EMPTY: Self = Self {
        begin: Self::AFTER_LAST,
        end: Self::BEFORE_FIRST,
    };

    /// Creates an interval.
    #[must_use]
    pub const fn new(begin: f64, end: f64) -> Self {
        Self { begin, end }
    }

    /// Returns `true` if the interval spans the whole stroke.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.begin == Self::BEFORE_FIRST && self.end == Self::AFTER_LAST
    }

    /// Returns `true` if the interval covers nothing.
    ///
    /// Single-position intervals (`begin == end`) are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin.is_nan() || self.end.is_nan() || self.begin >= self.end
    }

    /// Returns `true` if `findex` lies inside the interval.
    #[must_use]
    pub fn contains(&self, findex: f64) -> bool {
        self.begin <= findex && findex <= self.end
    }

    /// Resolves sentinels against a stroke whose last point index is `last_index`.
    #[must_use]
    pub fn resolve(&self, last_index: f64) -> (f64, f64) {
        let begin = if self.begin == Self::BEFORE_FIRST {
            0.0
        } else {
            self.begin.clamp(0.0, last_index)
        };
        let end = if self.end == Self::AFTER_LAST {
            last_index
        } else {
            self.end.clamp(0.0, last_index)
        };
        (begin, end)
    }
}

/// Sorts and merges intervals, snapping those that reach a stroke end to the
/// sentinels.
///
/// Intervals are clamped to `[0, last_index]`; overlapping or touching
/// intervals are merged; NaN and inverted intervals are dropped.
#[must_use]
pub fn normalize(intervals: &[StrokeFIndices], last_index: f64) -> Vec<StrokeFIndices> {
    let mut ranges: Vec<(f64, f64)> = intervals
        .iter()
        .filter(|r| !r.begin.is_nan() && !r.end.is_nan() && r.begin <= r.end)
        .map(|r| r.resolve(last_index))
        .collect();
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(ranges.len());
    for (begin, end) in ranges {
        match merged.last_mut() {
            Some(last) if begin <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((begin, end)),
        }
    }

    merged
        .into_iter()
        .map(|(begin, end)| StrokeFIndices {
            begin: if begin <= 0.0 {
                StrokeFIndices::BEFORE_FIRST
            } else {
                begin
            },
            end: if end >= last_index {
                StrokeFIndices::AFTER_LAST
            } else {
                end
            },
        })
        .collect()
}

/// The gaps between sorted, normalized intervals.
///
/// Includes the lead-in before the first interval and the tail-out after the
/// last one unless an interval already reaches that end. The complement of
/// nothing is [`StrokeFIndices::FULL`].
#[must_use]
pub fn complement(sorted: &[StrokeFIndices]) -> Vec<StrokeFIndices> {
    let mut out = Vec::with_capacity(sorted.len() + 1);
    let mut cursor = StrokeFIndices::BEFORE_FIRST;
    for range in sorted {
        if range.begin > cursor {
            out.push(StrokeFIndices::new(cursor, range.begin));
        }
        cursor = cursor.max(range.end);
    }
    if cursor < StrokeFIndices::AFTER_LAST {
        out.push(StrokeFIndices::new(cursor, StrokeFIndices::AFTER_LAST));
    }
    out
}

/// Where a tool met a stroke.
///
/// `in_segment` is the part of the stroke inside the tool's region. `hit` is
/// the whole run of nodes the tool touched; for a lasso it widens the inside
/// part to the enclosing point indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeIntersection {
    /// Nodes touched by the tool.
    pub hit: StrokeFIndices,
    /// Part of the stroke inside the tool's region.
    pub in_segment: StrokeFIndices,
}

impl StrokeIntersection {
    /// An intersection whose hit and inside parts coincide.
    #[must_use]
    pub const fn new(range: StrokeFIndices) -> Self {
        Self {
            hit: range,
            in_segment: range,
        }
    }

    /// Widens an inside range to whole point indices for the hit part.
    #[must_use]
    pub fn widened(in_segment: StrokeFIndices) -> Self {
        let snap = |f: f64, up: bool| {
            if f == StrokeFIndices::BEFORE_FIRST || f == StrokeFIndices::AFTER_LAST {
                f
            } else if up {
                f.ceil()
            } else {
                f.floor()
            }
        };
        Self {
            hit: StrokeFIndices::new(snap(in_segment.begin, false), snap(in_segment.end, true)),
            in_segment,
        }
    }
}

/// The inside parts of `intersections`, in order.
#[must_use]
pub fn in_segments(intersections: &[StrokeIntersection]) -> Vec<StrokeFIndices> {
    intersections
        .iter()
        .map(|i| i.in_segment)
        .filter(|r| *r != StrokeFIndices::EMPTY)
        .collect()
}

/// The hit parts of `intersections`, in order.
#[must_use]
pub fn hit_segments(intersections: &[StrokeIntersection]) -> Vec<StrokeFIndices> {
    intersections
        .iter()
        .map(|i| i.hit)
        .filter(|r| *r != StrokeFIndices::EMPTY)
        .collect()
}

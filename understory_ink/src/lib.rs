// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Ink: geometry and hit testing for freehand ink strokes.
//!
//! A [`Stroke`] is an ordered run of [`StylusPoint`]s drawn with a set of
//! [`DrawingAttributes`]. This crate turns strokes into geometry and answers
//! questions about them:
//!
//! - **Smoothing**: [`fit_points`] fits cubic Beziers through the points and
//!   flattens them back into a re-sampled polyline, interpolating pressure
//!   and extra channels along the way.
//! - **Nodes**: [`StrokeNodeIterator`] walks the (possibly smoothed) points
//!   and yields one [`StrokeNode`] per point, the convex area the tip sweeps
//!   from the previous point.
//! - **Hit testing**: taps, rectangles and lassos with a "percent inside"
//!   threshold weighted by arc length ([`PointWeights`]), and arbitrary
//!   [`StylusShape`]s swept along a path ([`ErasingStroke`]).
//! - **Clipping and erasing**: hits are expressed as fractional-index
//!   intervals ([`StrokeFIndices`], [`StrokeIntersection`]) and turned into
//!   new stroke fragments with [`Stroke::clip_at`] and [`Stroke::erase_at`].
//! - **Collections**: [`StrokeCollection`] keeps strokes ordered and unique by
//!   [`StrokeId`], applies collection-wide transforms and cuts, and queues one
//!   [`StrokeCollectionChanged`] per membership change for each subscriber.
//!
//! Stateful, incremental variants of the lasso and eraser hit tests live in
//! `understory_ink_hit`.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_ink::{Stroke, StrokeCollection, stylus_points_from};
//!
//! let stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (10.0, 0.0)])).unwrap();
//! assert!(stroke.hit_test_point_with_diameter(Point::new(5.0, 0.0), 2.0).unwrap());
//!
//! let mut ink = StrokeCollection::new();
//! ink.push(stroke).unwrap();
//! let lasso = [
//!     Point::new(-5.0, -5.0),
//!     Point::new(15.0, -5.0),
//!     Point::new(15.0, 5.0),
//!     Point::new(-5.0, 5.0),
//! ];
//! assert_eq!(ink.hit_test_lasso(&lasso, 80).unwrap().len(), 1);
//! ```
//!
//! ## Caching
//!
//! Bounds, Bezier-fitted points and the renderable outline of a stroke are
//! computed on first use and kept until a geometry-relevant change. Which
//! changes count is decided by [`DrawingAttributes::is_geometrically_equal`]:
//! recoloring a stroke keeps its cached geometry, resizing its tip does not.
//! [`Stroke::revision`] is bumped once per such change so external caches can
//! detect staleness without callbacks.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Use floating point implementations from `libm` in `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attributes;
mod bezier;
mod collection;
mod erasing;
mod error;
mod findices;
mod lasso;
mod node;
mod point;
mod shape;
mod stroke;
mod util;
mod weights;

pub use attributes::{
    DEFAULT_FITTING_ERROR, DEFAULT_TIP_SIZE, DrawingAttributes, DrawingFlags, MAX_HEIGHT,
    MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH, StylusTip,
};
pub use bezier::{FLATTENING_SCALE, MIN_FLATTENING_TOLERANCE, fit_points, flattening_tolerance};
pub use collection::{CollectionId, StrokeCollection, StrokeCollectionChanged, SubscriptionId};
pub use erasing::ErasingStroke;
pub use error::InkError;
pub use findices::{
    StrokeFIndices, StrokeIntersection, complement, hit_segments, in_segments, normalize,
};
pub use lasso::{LASSO_MIN_DISTANCE, Lasso};
pub use node::{StrokeNode, StrokeNodeIterator};
pub use point::{DEFAULT_PRESSURE, StylusPoint, stylus_points_from};
pub use shape::{ELLIPSE_VERTEX_COUNT, ShapeVertices, StylusShape};
pub use stroke::{ExtendedProperties, Stroke, StrokeId, TAP_HIT_POINT_SIZE};
pub use weights::{PERCENTAGE_TOLERANCE, PointWeights, check_percent};

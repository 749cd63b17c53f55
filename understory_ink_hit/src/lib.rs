// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Ink Hit: incremental lasso selection and erasing.
//!
//! The one-shot hit tests in `understory_ink` look at a whole lasso or eraser
//! path at once. Interactive tools produce that path a few points at a time,
//! and retesting every stroke against the whole path on every pointer move
//! does work proportional to the path length. The testers here keep state
//! between moves instead:
//!
//! - [`IncrementalLassoHitTester`] keeps each stroke's inside weight and only
//!   adjusts it by the points that changed sides since the last move. It
//!   reports selection flips as one [`LassoSelectionChanged`] per move.
//! - [`IncrementalStrokeHitTester`] sweeps an eraser shape through each new
//!   run of points and reports one [`StrokeHitEvent`] per touched stroke.
//!
//! Both keep a [`StrokeInfo`] per stroke, parallel to the collection. The
//! testers subscribe to the collection when created and catch up with its
//! change queue at the start of every call, so strokes may be added, removed
//! or edited between moves. If the cache cannot be reconciled it is rebuilt.
//!
//! The testers never hold on to the collection. Every call takes it by
//! reference, and [`IncrementalLassoHitTester::end_hit_testing`] (or the
//! eraser's counterpart) detaches from it. Calls after that are errors.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_ink::{Stroke, StrokeCollection, StylusShape, stylus_points_from};
//! use understory_ink_hit::{IncrementalLassoHitTester, IncrementalStrokeHitTester};
//!
//! let stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (10.0, 0.0)])).unwrap();
//! let id = stroke.id();
//! let mut ink = StrokeCollection::from_strokes(vec![stroke]).unwrap();
//!
//! let mut lasso = IncrementalLassoHitTester::new(&mut ink, 80).unwrap();
//! let change = lasso
//!     .add_points(
//!         &ink,
//!         [
//!             Point::new(-5.0, -5.0),
//!             Point::new(15.0, -5.0),
//!             Point::new(15.0, 5.0),
//!             Point::new(-5.0, 5.0),
//!         ],
//!     )
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(change.selected, [id]);
//! lasso.end_hit_testing(&mut ink).unwrap();
//!
//! let mut eraser = IncrementalStrokeHitTester::new(&mut ink, StylusShape::ellipse(2.0, 2.0));
//! let events = eraser
//!     .add_points(&ink, [Point::new(5.0, -5.0), Point::new(5.0, 5.0)])
//!     .unwrap();
//! assert_eq!(events.len(), 1);
//! events[0].apply_point_erase(&mut ink).unwrap();
//! assert_eq!(ink.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Use floating point implementations from `libm` in `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod info;
mod lasso;
mod stroke;

pub use info::StrokeInfo;
pub use lasso::{IncrementalLassoHitTester, LassoSelectionChanged};
pub use stroke::{IncrementalStrokeHitTester, StrokeHitEvent};

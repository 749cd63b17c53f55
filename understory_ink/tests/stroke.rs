// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-level hit testing, clipping and erasing through the public API.

use kurbo::{Point, Rect, Shape};
use understory_ink::{
    DrawingAttributes, InkError, MIN_FLATTENING_TOLERANCE, Stroke, StrokeFIndices, StylusPoint,
    StylusShape, flattening_tolerance, stylus_points_from,
};

fn straight(n: usize) -> Stroke {
    Stroke::new(stylus_points_from((0..n).map(|i| (i as f64 * 10.0, 0.0)))).unwrap()
}

fn xs(stroke: &Stroke) -> Vec<f64> {
    stroke.points().iter().map(|p| p.position.x).collect()
}

#[test]
fn tap_hits_near_the_ink_only() {
    let stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (10.0, 0.0)])).unwrap();
    assert_eq!(
        stroke.hit_test_point_with_diameter(Point::new(5.0, 0.0), 2.0),
        Ok(true)
    );
    assert_eq!(
        stroke.hit_test_point_with_diameter(Point::new(100.0, 100.0), 2.0),
        Ok(false)
    );
    assert!(stroke.hit_test_point(Point::new(10.5, 0.5)));
    assert!(!stroke.hit_test_point(Point::new(5.0, 3.0)));
}

#[test]
fn rect_partial_hit_is_weighted_by_length() {
    let stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)])).unwrap();
    let left_half = Rect::new(-1.0, -1.0, 5.5, 1.0);
    assert_eq!(stroke.hit_test_rect(left_half, 50), Ok(true));
    assert_eq!(stroke.hit_test_rect(left_half, 90), Ok(false));
    assert_eq!(stroke.hit_test_rect(Rect::new(50.0, 50.0, 60.0, 60.0), 0), Ok(true));
    assert_eq!(
        stroke.hit_test_rect(left_half, 101),
        Err(InkError::PercentOutOfRange(101))
    );
}

#[test]
fn full_percentage_needs_every_point() {
    let stroke = straight(4);
    assert_eq!(stroke.hit_test_rect(Rect::new(-1.0, -1.0, 31.0, 1.0), 100), Ok(true));
    assert_eq!(stroke.hit_test_rect(Rect::new(-1.0, -1.0, 29.0, 1.0), 100), Ok(false));
}

#[test]
fn lasso_hit_uses_the_same_weights() {
    let stroke = Stroke::new(stylus_points_from([(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)])).unwrap();
    let lasso = [
        Point::new(-1.0, -1.0),
        Point::new(5.5, -1.0),
        Point::new(5.5, 1.0),
        Point::new(-1.0, 1.0),
    ];
    assert_eq!(stroke.hit_test_lasso(&lasso, 50), Ok(true));
    assert_eq!(stroke.hit_test_lasso(&lasso, 90), Ok(false));
    assert_eq!(stroke.hit_test_lasso(&[], 50), Err(InkError::EmptyPoints));
}

#[test]
fn erasing_across_the_middle_leaves_prefix_and_suffix() {
    let stroke = straight(10);
    let eraser = StylusShape::ellipse(2.0, 2.0);
    let path = [Point::new(45.0, -10.0), Point::new(45.0, 10.0)];
    assert_eq!(stroke.hit_test_path(&path, &eraser), Ok(true));

    let parts = stroke.erase_result_path(&path, &eraser).unwrap();
    assert_eq!(parts.len(), 2);
    let (prefix, suffix) = (xs(&parts[0]), xs(&parts[1]));
    assert_eq!(&prefix[..5], &[0.0, 10.0, 20.0, 30.0, 40.0]);
    assert!(prefix[5] > 40.0 && prefix[5] < 45.0);
    assert!(suffix[0] > 45.0 && suffix[0] < 50.0);
    assert_eq!(&suffix[1..], &[50.0, 60.0, 70.0, 80.0, 90.0]);
    assert!(parts.iter().all(|p| p.id() != stroke.id()));
}

#[test]
fn missing_eraser_returns_whole_copy() {
    let stroke = straight(5);
    let eraser = StylusShape::rectangle(2.0, 2.0);
    let parts = stroke
        .erase_result_path(&[Point::new(0.0, 50.0), Point::new(40.0, 50.0)], &eraser)
        .unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].points(), stroke.points());
    assert_ne!(parts[0].id(), stroke.id());
}

#[test]
fn clip_and_erase_cover_the_stroke_once() {
    let stroke = straight(10);
    let lasso = [
        Point::new(25.0, -10.0),
        Point::new(65.0, -10.0),
        Point::new(65.0, 10.0),
        Point::new(25.0, 10.0),
    ];
    let clipped = stroke.clip_result_lasso(&lasso).unwrap();
    let erased = stroke.erase_result_lasso(&lasso).unwrap();
    assert_eq!(clipped.len(), 1);
    assert_eq!(erased.len(), 2);
    assert_eq!(xs(&clipped[0]), [25.0, 30.0, 40.0, 50.0, 60.0, 65.0]);

    let mut original: Vec<f64> = clipped
        .iter()
        .chain(&erased)
        .flat_map(xs)
        .filter(|x| x % 10.0 == 0.0)
        .collect();
    original.sort_by(f64::total_cmp);
    assert_eq!(original, xs(&stroke));
}

#[test]
fn rect_clip_and_erase_match_lasso() {
    let stroke = straight(10);
    let rect = Rect::new(25.0, -10.0, 65.0, 10.0);
    assert_eq!(xs(&stroke.clip_result_rect(rect)[0]), [25.0, 30.0, 40.0, 50.0, 60.0, 65.0]);
    let erased = stroke.erase_result_rect(rect);
    assert_eq!(xs(&erased[0]), [0.0, 10.0, 20.0, 25.0]);
    assert_eq!(xs(&erased[1]), [65.0, 70.0, 80.0, 90.0]);
}

#[test]
fn degenerate_clip_ranges_are_dropped() {
    let stroke = straight(4);
    let parts = stroke.clip_at(&[StrokeFIndices::new(1.5, 1.5), StrokeFIndices::new(2.0, 1.0)]);
    assert!(parts.is_empty());
}

#[test]
fn bounds_are_the_union_of_node_bounds() {
    let stroke = Stroke::new(vec![
        StylusPoint::with_pressure(0.0, 0.0, 0.2),
        StylusPoint::with_pressure(10.0, 5.0, 0.9),
        StylusPoint::with_pressure(20.0, -3.0, 0.5),
    ])
    .unwrap();
    let union = stroke
        .nodes()
        .map(|n| n.bounds())
        .reduce(|a, b| a.union(b))
        .unwrap();
    assert_eq!(stroke.bounds(), union);
    assert_eq!(stroke.bounds(), stroke.bounds());
}

#[test]
fn fitted_strokes_fall_back_for_single_points() {
    let mut attributes = DrawingAttributes::new();
    attributes.set_fit_to_curve(true);
    let stroke = Stroke::with_attributes(vec![StylusPoint::new(4.0, 2.0)], attributes).unwrap();
    assert_eq!(stroke.bezier_points(), stroke.points());
    assert_eq!(stroke.effective_points(), stroke.points());
}

#[test]
fn flattening_tolerance_has_a_floor() {
    for size in [0.0, 1e-300, 1e-6, 0.1, 0.5] {
        let tolerance = flattening_tolerance(Rect::new(0.0, 0.0, size, size));
        assert!(tolerance >= MIN_FLATTENING_TOLERANCE, "size {size}");
    }
}

#[test]
fn geometry_tracks_geometric_attribute_changes() {
    let mut stroke = straight(3);
    let thin = stroke.geometry();
    let mut wide = *stroke.drawing_attributes();
    wide.set_width(10.0).unwrap();
    wide.set_height(10.0).unwrap();
    stroke.set_drawing_attributes(wide);
    let thick = stroke.geometry();
    assert!(thick.bounding_box().height() > thin.bounding_box().height());
}

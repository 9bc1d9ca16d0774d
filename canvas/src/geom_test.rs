#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn from_corners_normalizes_any_drag_direction() {
    let a = Rect::from_corners(Point::new(10.0, 50.0), Point::new(-20.0, 0.0));
    assert_eq!(a, Rect::new(-20.0, 0.0, 30.0, 50.0));
}

#[test]
fn edges_and_center() {
    let r = Rect::new(10.0, 20.0, 100.0, 40.0);
    assert_eq!(r.right(), 110.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center(), Point::new(60.0, 40.0));
}

#[test]
fn contains_is_inclusive_on_edges() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(!r.contains(Point::new(10.01, 5.0)));
}

#[test]
fn touching_rects_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
    assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
}

#[test]
fn inflate_translate_union() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(r.inflate(5.0), Rect::new(-5.0, -5.0, 20.0, 20.0));
    assert_eq!(r.translate(3.0, -2.0), Rect::new(3.0, -2.0, 10.0, 10.0));
    assert_eq!(r.union(&Rect::new(20.0, 5.0, 5.0, 30.0)), Rect::new(0.0, 0.0, 25.0, 35.0));
}

#[test]
fn point_distance() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    assert_eq!(Point::new(5.0, 5.0) - Point::new(2.0, 1.0), Point::new(3.0, 4.0));
    assert_eq!(Point::new(1.0, 1.0) + Point::new(2.0, 3.0), Point::new(3.0, 4.0));
}

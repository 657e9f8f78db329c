//! Narrow-phase collision tests between world-space shapes
//!
//! Boxes, circles and segments use closed-form tests. Anything involving a
//! polyline goes through the general polygon path: edge crossings plus
//! containment for closed polylines, which handles concave outlines as well
//! as convex ones. Polyline pairs are pre-screened with bounding boxes.
//!
//! Touching counts as a collision for every pair except two boxes, which must
//! share interior area so that solid boxes can rest against each other. A box
//! rotated by a whole number of quarter turns still resolves to a box. At any
//! other angle it is a polygon, and a polygon touching a box collides.

use super::primitives::{Aabb, Circle, Polyline, Segment};
use super::shape::WorldShape;

/// Boolean intersection test between two shapes
pub fn collide(a: &WorldShape, b: &WorldShape) -> bool {
    if (a.is_complex() || b.is_complex()) && !a.aabb().intersects(&b.aabb()) {
        return false;
    }

    use WorldShape::{Circle as C, Polyline as P, Rect as R, Segment as S};
    match (a, b) {
        (R(a), R(b)) => a.overlaps_interior(b),
        (C(a), C(b)) => circle_circle(a, b),
        (C(c), R(r)) | (R(r), C(c)) => circle_rect(c, r),
        (C(c), S(s)) | (S(s), C(c)) => s.distance_squared_to(c.center) <= c.radius * c.radius,
        (C(c), P(p)) | (P(p), C(c)) => circle_polyline(c, p),
        (R(r), S(s)) | (S(s), R(r)) => rect_segment(r, s),
        (R(r), P(p)) | (P(p), R(r)) => polyline_polyline(&r.to_polyline(), p),
        (S(a), S(b)) => a.intersects(b),
        (S(s), P(p)) | (P(p), S(s)) => polyline_polyline(&segment_polyline(s), p),
        (P(a), P(b)) => polyline_polyline(a, b),
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let radius_sum = a.radius + b.radius;
    (a.center - b.center).magnitude_squared() <= radius_sum * radius_sum
}

fn circle_rect(circle: &Circle, rect: &Aabb) -> bool {
    let closest = rect.closest_point(circle.center);
    (closest - circle.center).magnitude_squared() <= circle.radius * circle.radius
}

fn circle_polyline(circle: &Circle, polyline: &Polyline) -> bool {
    polyline.contains_point(circle.center)
        || polyline.distance_squared_to(circle.center) <= circle.radius * circle.radius
}

fn rect_segment(rect: &Aabb, segment: &Segment) -> bool {
    if rect.contains_point(segment.start) || rect.contains_point(segment.end) {
        return true;
    }
    if !rect.intersects(&segment.aabb()) {
        return false;
    }
    rect.to_polyline().edges().any(|edge| edge.intersects(segment))
}

fn segment_polyline(segment: &Segment) -> Polyline {
    Polyline::new(vec![segment.start, segment.end], false)
}

fn polyline_polyline(a: &Polyline, b: &Polyline) -> bool {
    let edges_cross = a.edges().any(|edge_a| b.edges().any(|edge_b| edge_a.intersects(&edge_b)));
    if edges_cross {
        return true;
    }
    // No crossing edges: the only remaining overlap is one outline fully inside the other
    let b_inside_a = b.points.first().is_some_and(|&p| a.contains_point(p));
    let a_inside_b = a.points.first().is_some_and(|&p| b.contains_point(p));
    b_inside_a || a_inside_b
}

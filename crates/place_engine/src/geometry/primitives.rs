//! Primitive world-space shapes and the geometric predicates built on them
//!
//! Everything here is plain data in world coordinates. Shapes are produced by
//! the resolver in [`super::shape`] and consumed by the narrow phase in
//! [`super::intersect`].

use crate::foundation::math::{cross, Vec2};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner (smallest x and y)
    pub min: Vec2,
    /// Bottom-right corner (largest x and y)
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from two opposite corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a box from its top-left corner and size
    pub fn from_origin_size(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin, origin + Vec2::new(width, height))
    }

    /// Smallest box enclosing all points, `None` for an empty iterator
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: Vec2::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
            max: Vec2::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
        }))
    }

    /// Box width
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Box height
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Box center
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test that counts touching edges as overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Overlap test that requires a shared interior; touching boxes do not overlap
    pub fn overlaps_interior(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Point inside the box closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Corners in clockwise screen order starting at the top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// The box outline as a closed polyline
    pub fn to_polyline(&self) -> Polyline {
        Polyline::new(self.corners().to_vec(), true)
    }
}

/// A circle; a zero radius makes it a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center in world space
    pub center: Vec2,
    /// Radius, never negative
    pub radius: f32,
}

impl Circle {
    /// Create a circle; negative radii are taken by magnitude
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius: radius.abs() }
    }

    /// A degenerate zero-radius circle
    pub fn point(center: Vec2) -> Self {
        Self { center, radius: 0.0 }
    }

    /// Bounding box
    pub fn aabb(&self) -> Aabb {
        let r = Vec2::new(self.radius, self.radius);
        Aabb { min: self.center - r, max: self.center + r }
    }

    /// Whether `point` lies within `radius` of the center (inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }
}

/// A line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
}

impl Segment {
    /// Create a segment between two points
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Bounding box
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.start, self.end)
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        (self.end - self.start).magnitude()
    }

    /// Point on the segment closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let delta = self.end - self.start;
        let length_sq = delta.magnitude_squared();
        if length_sq == 0.0 {
            return self.start;
        }
        let t = ((point - self.start).dot(&delta) / length_sq).clamp(0.0, 1.0);
        self.start + delta * t
    }

    /// Squared distance from `point` to the segment
    pub fn distance_squared_to(&self, point: Vec2) -> f32 {
        (self.closest_point(point) - point).magnitude_squared()
    }

    /// Segment-segment intersection, including touching endpoints and collinear overlap
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, p2, p3, p4) = (self.start, self.end, other.start, other.end);
        let d1 = cross(p4 - p3, p1 - p3);
        let d2 = cross(p4 - p3, p2 - p3);
        let d3 = cross(p2 - p1, p3 - p1);
        let d4 = cross(p2 - p1, p4 - p1);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && other.aabb().contains_point(p1))
            || (d2 == 0.0 && other.aabb().contains_point(p2))
            || (d3 == 0.0 && self.aabb().contains_point(p3))
            || (d4 == 0.0 && self.aabb().contains_point(p4))
    }
}

/// A connected chain of segments, optionally closed into a polygon
///
/// A closed polyline is treated as a filled polygon by the narrow phase; an
/// open one is only its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Vertices in world space
    pub points: Vec<Vec2>,
    /// Whether the last vertex connects back to the first
    pub closed: bool,
}

impl Polyline {
    /// Create a polyline from world-space vertices
    pub fn new(points: Vec<Vec2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Bounding box; a polyline without vertices has a zero box at the origin
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.points).unwrap_or(Aabb { min: Vec2::zeros(), max: Vec2::zeros() })
    }

    /// Iterate over the edges, including the closing edge of a closed polyline
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let open_edges = self.points.windows(2).map(|pair| Segment::new(pair[0], pair[1]));
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 2 => Some(Segment::new(last, first)),
            _ => None,
        };
        open_edges.chain(closing)
    }

    /// Even-odd containment test; always false for open polylines
    pub fn contains_point(&self, point: Vec2) -> bool {
        if !self.closed || self.points.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > point.y) != (b.y > point.y) {
                let x_at = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < x_at {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Smallest squared distance from `point` to any edge
    pub fn distance_squared_to(&self, point: Vec2) -> f32 {
        self.edges()
            .map(|edge| edge.distance_squared_to(point))
            .fold(f32::INFINITY, f32::min)
    }
}

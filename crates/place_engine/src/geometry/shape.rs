//! Shape descriptors and their resolution into world-space shapes
//!
//! A [`ShapeDescriptor`] is the declarative, model-space shape an entity type
//! is authored with. It is turned into a concrete [`WorldShape`] on demand by
//! [`ShapeDescriptor::resolve`], given a [`Pose`] (position, scale, rotation).
//! Resolution is a pure function: hypothetical placements are answered by
//! resolving with a different pose, never by mutating the entity.

use super::primitives::{Aabb, Circle, Polyline, Segment};
use crate::foundation::math::{quarter_turns, rotate, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Declarative collision shape in model space
///
/// Serialized with a `type` tag, matching the level data format:
/// `{ "type": "rect", "left": 16, "top": 32, "right": 16, "bottom": 0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeDescriptor {
    /// Rectangle given by its extents outward from the origin
    Rect {
        /// Extent to the left of the origin
        left: f32,
        /// Extent above the origin
        top: f32,
        /// Extent to the right of the origin
        right: f32,
        /// Extent below the origin
        bottom: f32,
    },
    /// Circle centered on the origin
    Circle {
        /// Unscaled radius
        #[serde(alias = "r")]
        radius: f32,
    },
    /// A single point at the origin
    Point,
    /// Connected polyline through model-space points
    #[serde(alias = "strip")]
    LineStrip {
        /// Vertices relative to the origin
        points: Vec<Vec2>,
        /// Whether the strip closes into a polygon
        #[serde(default, alias = "closedStrip")]
        closed: bool,
    },
    /// Single segment between two model-space points
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
    },
    /// Missing or unrecognised descriptor; resolves to a point
    #[serde(other)]
    Unknown,
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        Self::Point
    }
}

impl ShapeDescriptor {
    /// Rectangle with its top-left corner on the origin
    pub fn rect_from_origin(width: f32, height: f32) -> Self {
        Self::Rect { left: 0.0, top: 0.0, right: width, bottom: height }
    }

    /// Rectangle centered on the origin
    pub fn centered_rect(width: f32, height: f32) -> Self {
        Self::Rect {
            left: width / 2.0,
            top: height / 2.0,
            right: width / 2.0,
            bottom: height / 2.0,
        }
    }

    /// Circle of the given radius
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Resolve into a world-space shape
    ///
    /// `ellipse_segments` is the polygon resolution used when a circle is
    /// scaled non-uniformly.
    pub fn resolve(&self, pose: &Pose, ellipse_segments: usize) -> WorldShape {
        let Pose { position, scale, rotation } = *pose;
        match self {
            Self::Rect { left, top, right, bottom } => {
                let corners = [
                    Vec2::new(-left * scale.x, -top * scale.y),
                    Vec2::new(right * scale.x, -top * scale.y),
                    Vec2::new(right * scale.x, bottom * scale.y),
                    Vec2::new(-left * scale.x, bottom * scale.y),
                ];
                let turned = corners.map(|c| position + rotate(c, rotation));
                if quarter_turns(rotation).is_some() {
                    // Still axis-aligned; negative scale mirrors the box about the origin
                    WorldShape::Rect(Aabb::new(turned[0], turned[2]))
                } else {
                    WorldShape::Polyline(Polyline::new(turned.to_vec(), true))
                }
            }
            Self::Circle { radius } => {
                if scale.x.abs() == scale.y.abs() {
                    WorldShape::Circle(Circle::new(position, radius * scale.x.abs()))
                } else {
                    let segments = ellipse_segments.max(3);
                    let points = (0..segments)
                        .map(|i| {
                            let angle = TAU * i as f32 / segments as f32;
                            let local = Vec2::new(
                                angle.cos() * radius * scale.x,
                                angle.sin() * radius * scale.y,
                            );
                            position + rotate(local, rotation)
                        })
                        .collect();
                    WorldShape::Polyline(Polyline::new(points, true))
                }
            }
            Self::LineStrip { points, closed } => match points.as_slice() {
                [] => {
                    log::trace!("Empty line strip resolved as a point");
                    WorldShape::Circle(Circle::point(position))
                }
                [single] => WorldShape::Circle(Circle::point(
                    position + rotate(single.component_mul(&scale), rotation),
                )),
                _ => {
                    let world = points
                        .iter()
                        .map(|p| position + rotate(p.component_mul(&scale), rotation))
                        .collect();
                    WorldShape::Polyline(Polyline::new(world, *closed))
                }
            },
            Self::Line { x1, y1, x2, y2 } => {
                let start = Vec2::new(position.x + x1 * scale.x, position.y + y1 * scale.y);
                let end = start + Vec2::new((x2 - x1) * scale.x, (y2 - y1) * scale.y);
                WorldShape::Segment(Segment::new(start, end))
            }
            Self::Point => WorldShape::Circle(Circle::point(position)),
            Self::Unknown => {
                log::trace!("Unknown shape descriptor resolved as a point");
                WorldShape::Circle(Circle::point(position))
            }
        }
    }
}

/// Position, scale and rotation used to place a shape in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space origin
    pub position: Vec2,
    /// Per-axis scale; negative values mirror
    pub scale: Vec2,
    /// Rotation in degrees, counter-clockwise on screen
    pub rotation: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Pose {
    /// Unscaled, unrotated pose at `position`
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    /// The same pose moved to `position`
    pub fn with_position(self, position: Vec2) -> Self {
        Self { position, ..self }
    }
}

/// Concrete world-space collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    /// Axis-aligned rectangle
    Rect(Aabb),
    /// Circle or, with zero radius, a point
    Circle(Circle),
    /// Line segment
    Segment(Segment),
    /// Polyline or polygon
    Polyline(Polyline),
}

impl WorldShape {
    /// Bounding box
    pub fn aabb(&self) -> Aabb {
        match self {
            Self::Rect(rect) => *rect,
            Self::Circle(circle) => circle.aabb(),
            Self::Segment(segment) => segment.aabb(),
            Self::Polyline(polyline) => polyline.aabb(),
        }
    }

    /// Shapes whose exact test is expensive enough to warrant a box pre-check
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Polyline(_))
    }
}

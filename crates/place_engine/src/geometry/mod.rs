//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - World-space boxes, circles, segments and polylines
//! - [`shape`] - Declarative shape descriptors and the resolver that places them
//! - [`intersect`] - Narrow-phase intersection between resolved shapes
//!
//! # Key Types
//!
//! - [`ShapeDescriptor`] - Model-space shape attached to an entity type
//! - [`Pose`] - Position, scale and rotation used to place a descriptor
//! - [`WorldShape`] - Resolved world-space shape for collision testing

pub mod primitives;
pub mod shape;
pub mod intersect;

pub use primitives::{Aabb, Circle, Polyline, Segment};
pub use shape::{Pose, ShapeDescriptor, WorldShape};
pub use intersect::collide;

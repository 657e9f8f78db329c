//! # Place Engine
//!
//! Spatial hashing and collision queries for 2D platformers.
//!
//! ## Features
//!
//! - **Spatial Hash**: Uniform grid broad phase with incremental re-indexing
//! - **Shape Resolution**: Rectangles, circles, points, lines and line strips
//!   placed by position, scale and rotation
//! - **Narrow Phase**: Exact tests between boxes, circles, segments and polygons
//! - **Queries**: Occupancy, type meetings, tiles, nearest/furthest, stepped
//!   movement, goal seeking with obstacle avoidance and shape traces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use place_engine::prelude::*;
//!
//! fn main() -> Result<(), PlaceError> {
//!     let mut world = PlaceWorld::new(PlaceConfig::default())?;
//!     let room = world.add_room("level_1");
//!
//!     let hero = world.spawn(
//!         room,
//!         EntityDesc::new("Hero", 32.0, 32.0).with_shape(ShapeDescriptor::centered_rect(16.0, 24.0)),
//!     )?;
//!     world.spawn(
//!         room,
//!         EntityDesc::new("Wall", 64.0, 32.0)
//!             .with_shape(ShapeDescriptor::centered_rect(32.0, 32.0))
//!             .with_group("Solid"),
//!     )?;
//!
//!     if let Some(blocked) = world.move_by_axes(hero, 24.0, 0.0, Some("Solid"), None)? {
//!         println!("blocked: {:?}", blocked);
//!     }
//!     world.end_frame();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod spatial;
pub mod world;
pub mod query;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError, PlaceConfig};
pub use error::{PlaceError, Result};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, PlaceConfig},
        error::PlaceError,
        foundation::math::{Vec2, from_direction, point_direction},
        geometry::{Aabb, Pose, ShapeDescriptor, WorldShape},
        query::{AxisObstacles, Obstacle, TileFilter},
        world::{EntityDesc, EntityKey, FrameReport, PlaceWorld, RoomKey, TileDesc, TileKey, TilemapKey},
    };
}

//! Query engine
//!
//! Every query combines the three lower layers the same way: the spatial hash
//! narrows the search to the items filed under the probe's cells, a filter
//! drops candidates by group, type or depth, and the narrow phase decides.
//! Queries about an entity accept an optional hypothetical position and
//! resolve the entity's shape there without touching its live state.

pub mod movement;
pub mod nearest;
pub mod occupancy;
pub mod trace;

pub use movement::Steering;

use crate::world::{EntityKey, Tile, TileKey};

/// Filter for tile queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TileFilter {
    /// Every tile matches
    #[default]
    Any,
    /// Tiles of this collision group
    Group(String),
    /// Tiles of tilemaps at this depth
    Depth(i32),
}

impl TileFilter {
    /// Whether `tile` passes the filter
    pub fn matches(&self, tile: &Tile) -> bool {
        match self {
            Self::Any => true,
            Self::Group(group) => tile.group() == Some(group.as_str()),
            Self::Depth(depth) => tile.depth() == *depth,
        }
    }
}

impl From<&str> for TileFilter {
    fn from(group: &str) -> Self {
        Self::Group(group.to_string())
    }
}

impl From<i32> for TileFilter {
    fn from(depth: i32) -> Self {
        Self::Depth(depth)
    }
}

impl From<Option<&str>> for TileFilter {
    fn from(group: Option<&str>) -> Self {
        group.map_or(Self::Any, Self::from)
    }
}

/// What stopped a stepped movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    /// Another entity
    Entity(EntityKey),
    /// A static tile
    Tile(TileKey),
}

/// Obstacles met by [`crate::world::PlaceWorld::move_by_axes`], per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisObstacles {
    /// What blocked horizontal movement
    pub x: Option<Obstacle>,
    /// What blocked vertical movement
    pub y: Option<Obstacle>,
}

impl AxisObstacles {
    /// Whether either axis was blocked
    pub fn any(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Exact group match; no filter matches everything
pub(crate) fn group_matches(filter: Option<&str>, group: Option<&str>) -> bool {
    filter.map_or(true, |wanted| group == Some(wanted))
}

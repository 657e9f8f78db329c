//! Static tiles and the tilemaps they belong to

use super::RoomKey;
use crate::foundation::math::Vec2;
use crate::geometry::{Aabb, WorldShape};
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Handle to a tilemap
    pub struct TilemapKey;
    /// Handle to a tile registered in the static index
    pub struct TileKey;
}

/// A tile rectangle as delivered by the level loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDesc {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
    /// Collision group of this particular tile
    #[serde(default)]
    pub group: Option<String>,
}

impl TileDesc {
    /// Ungrouped tile rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, group: None }
    }
}

/// A tile registered for collisions
#[derive(Debug, Clone)]
pub struct Tile {
    tilemap: TilemapKey,
    bounds: Aabb,
    group: Option<String>,
    depth: i32,
    shape: WorldShape,
}

impl Tile {
    pub(crate) fn new(tilemap: TilemapKey, desc: &TileDesc, group: Option<String>, depth: i32) -> Self {
        let bounds = Aabb::from_origin_size(Vec2::new(desc.x, desc.y), desc.width, desc.height);
        Self {
            tilemap,
            bounds,
            group,
            depth,
            shape: WorldShape::Rect(bounds),
        }
    }

    /// Tilemap the tile belongs to
    pub fn tilemap(&self) -> TilemapKey {
        self.tilemap
    }

    /// Top-left corner; the point the tile is hashed by
    pub fn position(&self) -> Vec2 {
        self.bounds.min
    }

    /// Tile rectangle
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Collision group
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Render depth of the owning tilemap
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Collision shape
    pub fn shape(&self) -> &WorldShape {
        &self.shape
    }
}

/// A layer of static tiles
#[derive(Debug, Clone)]
pub struct Tilemap {
    pub(crate) room: RoomKey,
    pub(crate) depth: i32,
    pub(crate) group: Option<String>,
    pub(crate) tiles: Vec<TileDesc>,
    pub(crate) registered: Vec<TileKey>,
    pub(crate) collisions_enabled: bool,
}

impl Tilemap {
    pub(crate) fn new(room: RoomKey, depth: i32, group: Option<String>, tiles: Vec<TileDesc>) -> Self {
        Self {
            room,
            depth,
            group,
            tiles,
            registered: Vec::new(),
            collisions_enabled: false,
        }
    }

    /// Room the tilemap belongs to
    pub fn room(&self) -> RoomKey {
        self.room
    }

    /// Render depth, usable as a tile query filter
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Default collision group for tiles without one
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Tile rectangles
    pub fn tiles(&self) -> &[TileDesc] {
        &self.tiles
    }

    /// Tiles registered in the static index
    pub fn registered_tiles(&self) -> &[TileKey] {
        &self.registered
    }

    /// Whether collisions were enabled
    pub fn collisions_enabled(&self) -> bool {
        self.collisions_enabled
    }
}

//! The collision world: entities, tiles, rooms and both spatial hashes
//!
//! [`PlaceWorld`] is the owning context of the engine. Storage and accessors
//! live here, the frame lifecycle hooks in [`lifecycle`], and the query
//! primitives in [`crate::query`].

pub mod entity;
pub mod tilemap;
pub mod lifecycle;

pub use entity::{Entity, EntityDesc, EntityKey, TransformChange};
pub use tilemap::{Tile, TileDesc, TileKey, Tilemap, TilemapKey};
pub use lifecycle::FrameReport;

use crate::config::PlaceConfig;
use crate::error::{PlaceError, Result};
use crate::query::Steering;
use crate::spatial::SpatialHash;
use slotmap::SlotMap;
use std::cell::Cell;
use std::collections::HashMap;

slotmap::new_key_type! {
    /// Handle to a room
    pub struct RoomKey;
}

/// A loaded room
#[derive(Debug, Clone)]
pub struct Room {
    name: String,
    pub(crate) tilemaps: Vec<TilemapKey>,
}

impl Room {
    /// Room name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tilemaps added to the room
    pub fn tilemaps(&self) -> &[TilemapKey] {
        &self.tilemaps
    }
}

/// Owning context of the collision engine
pub struct PlaceWorld {
    pub(crate) config: PlaceConfig,
    pub(crate) next_uid: u64,
    pub(crate) rooms: SlotMap<RoomKey, Room>,
    pub(crate) entities: SlotMap<EntityKey, Entity>,
    pub(crate) types: HashMap<String, Vec<EntityKey>>,
    pub(crate) tilemaps: SlotMap<TilemapKey, Tilemap>,
    pub(crate) tiles: SlotMap<TileKey, Tile>,
    pub(crate) entity_grid: SpatialHash<EntityKey>,
    pub(crate) tile_grid: SpatialHash<TileKey>,
    pub(crate) steering: Steering,
    pub(crate) last_distance: Cell<Option<f32>>,
}

impl PlaceWorld {
    /// Create an empty world
    pub fn new(config: PlaceConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Creating place world with {}x{} cells",
            config.grid_x,
            config.grid_y
        );
        Ok(Self {
            next_uid: 0,
            rooms: SlotMap::with_key(),
            entities: SlotMap::with_key(),
            types: HashMap::new(),
            tilemaps: SlotMap::with_key(),
            tiles: SlotMap::with_key(),
            entity_grid: SpatialHash::new(config.grid_x, config.grid_y),
            tile_grid: SpatialHash::new(config.grid_x, config.grid_y),
            steering: Steering::new(config.flip_period()),
            last_distance: Cell::new(None),
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &PlaceConfig {
        &self.config
    }

    /// Add an empty room
    pub fn add_room(&mut self, name: impl Into<String>) -> RoomKey {
        let name = name.into();
        log::info!("Adding room '{}'", name);
        self.rooms.insert(Room { name, tilemaps: Vec::new() })
    }

    /// Look up a room
    pub fn room(&self, key: RoomKey) -> Result<&Room> {
        self.rooms.get(key).ok_or(PlaceError::UnknownRoom(key))
    }

    /// Add a tilemap to a room; its tiles collide only once enabled
    pub fn add_tilemap(
        &mut self,
        room: RoomKey,
        depth: i32,
        group: Option<String>,
        tiles: Vec<TileDesc>,
    ) -> Result<TilemapKey> {
        let room_data = self.rooms.get_mut(room).ok_or(PlaceError::UnknownRoom(room))?;
        let key = self.tilemaps.insert(Tilemap::new(room, depth, group, tiles));
        room_data.tilemaps.push(key);
        Ok(key)
    }

    /// Look up a tilemap
    pub fn tilemap(&self, key: TilemapKey) -> Result<&Tilemap> {
        self.tilemaps.get(key).ok_or(PlaceError::UnknownTilemap(key))
    }

    /// Look up a live entity
    pub fn entity(&self, key: EntityKey) -> Result<&Entity> {
        self.entities.get(key).ok_or(PlaceError::StaleEntity(key))
    }

    /// Look up a live entity for mutation
    pub fn entity_mut(&mut self, key: EntityKey) -> Result<&mut Entity> {
        self.entities.get_mut(key).ok_or(PlaceError::StaleEntity(key))
    }

    /// Whether `key` refers to a live entity
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Iterate over all live entities
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Live entities of a type, in creation order
    pub fn entities_of_type(&self, type_name: &str) -> &[EntityKey] {
        self.types.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Look up a tile registered for collisions
    pub fn static_tile(&self, key: TileKey) -> Option<&Tile> {
        self.tiles.get(key)
    }

    /// Number of tiles registered for collisions
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Spatial hash of entities
    pub fn entity_grid(&self) -> &SpatialHash<EntityKey> {
        &self.entity_grid
    }

    /// Spatial hash of static tiles
    pub fn tile_grid(&self) -> &SpatialHash<TileKey> {
        &self.tile_grid
    }

    /// Shared steering state used by `go`
    pub fn steering(&self) -> &Steering {
        &self.steering
    }

    /// Distance found by the last `nearest` or `furthest` call
    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance.get()
    }
}

impl std::fmt::Debug for PlaceWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceWorld")
            .field("rooms", &self.rooms.len())
            .field("entities", &self.entities.len())
            .field("tiles", &self.tiles.len())
            .field("entity_cells", &self.entity_grid.cell_count())
            .field("tile_cells", &self.tile_grid.cell_count())
            .finish()
    }
}

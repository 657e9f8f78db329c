//! Frame lifecycle hooks
//!
//! These keep both spatial hashes in step with the entity arena: entities are
//! filed on creation, excised at the end of the frame they were destroyed in,
//! and re-filed once per frame after moving.

use super::{Entity, EntityDesc, EntityKey, PlaceWorld, RoomKey, Tile, TilemapKey, TransformChange};
use crate::error::{PlaceError, Result};
use std::time::Duration;

/// Summary of one end-of-frame maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Destroyed entities excised from the indexes
    pub removed: usize,
    /// Moved entities whose cell set changed
    pub reindexed: usize,
}

impl PlaceWorld {
    /// Create an entity in `room` and file it in the entity hash
    pub fn spawn(&mut self, room: RoomKey, desc: EntityDesc) -> Result<EntityKey> {
        if !self.rooms.contains_key(room) {
            return Err(PlaceError::UnknownRoom(room));
        }
        let uid = self.next_uid;
        self.next_uid += 1;

        let position = desc.pose.position;
        let type_name = desc.type_name.clone();
        let key = self.entities.insert(Entity::new(uid, room, desc));
        self.entity_grid.insert(key, position);
        self.types.entry(type_name).or_default().push(key);
        log::trace!("Spawned entity {} at ({}, {})", uid, position.x, position.y);
        Ok(key)
    }

    /// Flag an entity for removal at the end of the frame
    ///
    /// The entity stays visible to queries until [`PlaceWorld::end_frame`].
    pub fn destroy(&mut self, key: EntityKey) -> Result<()> {
        self.entity_mut(key)?.mark_destroyed();
        Ok(())
    }

    /// Excise destroyed entities, then re-file every entity that moved
    pub fn end_frame(&mut self) -> FrameReport {
        let destroyed: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.is_destroyed())
            .map(|(key, _)| key)
            .collect();
        for &key in &destroyed {
            self.excise(key);
        }

        let mut reindexed = 0;
        for (key, entity) in &mut self.entities {
            if entity.take_changes().contains(TransformChange::POSITION)
                && self.entity_grid.update(key, entity.position())
            {
                reindexed += 1;
            }
        }

        let report = FrameReport {
            removed: destroyed.len(),
            reindexed,
        };
        if report != FrameReport::default() {
            log::debug!(
                "End of frame: {} removed, {} reindexed, {} live",
                report.removed,
                report.reindexed,
                self.entities.len()
            );
        }
        report
    }

    /// Re-file a single entity right away instead of at the end of the frame
    ///
    /// Returns whether its cell set changed.
    pub fn sync_entity(&mut self, key: EntityKey) -> Result<bool> {
        let entity = self.entities.get_mut(key).ok_or(PlaceError::StaleEntity(key))?;
        entity.take_changes();
        Ok(self.entity_grid.update(key, entity.position()))
    }

    /// Feed elapsed time to the steering flip ticker
    pub fn advance_time(&mut self, delta: Duration) {
        self.steering.advance(delta);
    }

    /// Register every tile of a tilemap in the static index
    ///
    /// A tile's own group wins over `group`, which wins over the tilemap's
    /// default group. Returns the number of registered tiles.
    pub fn enable_tilemap_collisions(&mut self, key: TilemapKey, group: Option<&str>) -> Result<usize> {
        let tilemap = self.tilemaps.get_mut(key).ok_or(PlaceError::UnknownTilemap(key))?;
        if tilemap.collisions_enabled {
            log::warn!("Collisions were already enabled for tilemap {:?}", key);
            return Err(PlaceError::TilemapCollisionsAlreadyEnabled(key));
        }
        tilemap.collisions_enabled = true;

        let fallback = group.map(str::to_owned).or_else(|| tilemap.group.clone());
        for desc in &tilemap.tiles {
            let tile_group = desc.group.clone().or_else(|| fallback.clone());
            let tile = Tile::new(key, desc, tile_group, tilemap.depth);
            let position = tile.position();
            let tile_key = self.tiles.insert(tile);
            self.tile_grid.insert(tile_key, position);
            tilemap.registered.push(tile_key);
        }

        log::info!(
            "Enabled collisions for {} tiles at depth {}",
            tilemap.registered.len(),
            tilemap.depth
        );
        Ok(tilemap.registered.len())
    }

    /// Tear a room down with its entities and tilemaps
    ///
    /// Returns the number of entities removed.
    pub fn remove_room(&mut self, room: RoomKey) -> Result<usize> {
        let removed_room = self.rooms.remove(room).ok_or(PlaceError::UnknownRoom(room))?;

        let doomed: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.room() == room)
            .map(|(key, _)| key)
            .collect();
        for &key in &doomed {
            self.excise(key);
        }

        let mut tile_count = 0;
        for &tilemap_key in &removed_room.tilemaps {
            if let Some(tilemap) = self.tilemaps.remove(tilemap_key) {
                for tile_key in tilemap.registered {
                    self.tile_grid.remove(tile_key);
                    self.tiles.remove(tile_key);
                    tile_count += 1;
                }
            }
        }

        log::info!(
            "Removed room '{}' with {} entities and {} tiles",
            removed_room.name(),
            doomed.len(),
            tile_count
        );
        Ok(doomed.len())
    }

    fn excise(&mut self, key: EntityKey) {
        self.entity_grid.remove(key);
        if let Some(entity) = self.entities.remove(key) {
            if let Some(list) = self.types.get_mut(entity.type_name()) {
                list.retain(|&k| k != key);
                if list.is_empty() {
                    self.types.remove(entity.type_name());
                }
            }
        }
    }
}

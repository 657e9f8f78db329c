//! Placement tests for entities: `occupied`, `free`, `meet` and `tile`

use super::{group_matches, TileFilter};
use crate::error::{PlaceError, Result};
use crate::foundation::math::Vec2;
use crate::geometry::{collide, WorldShape};
use crate::world::{Entity, EntityKey, PlaceWorld, TileKey};
use std::borrow::Cow;
use std::collections::HashSet;

impl PlaceWorld {
    /// First other entity that `key` would collide with at `at`
    ///
    /// `None` for `at` tests the current position. With a `group`, only
    /// entities of that exact collision group are considered.
    pub fn occupied(&self, key: EntityKey, at: Option<Vec2>, group: Option<&str>) -> Result<Option<EntityKey>> {
        let hits = self.scan_entities(key, at, true, |other| group_matches(group, other.group()))?;
        Ok(hits.first().copied())
    }

    /// Every other entity that `key` would collide with at `at`
    pub fn occupied_all(&self, key: EntityKey, at: Option<Vec2>, group: Option<&str>) -> Result<Vec<EntityKey>> {
        self.scan_entities(key, at, false, |other| group_matches(group, other.group()))
    }

    /// Whether `key` would collide with nothing at `at`
    pub fn free(&self, key: EntityKey, at: Option<Vec2>, group: Option<&str>) -> Result<bool> {
        Ok(self.occupied(key, at, group)?.is_none())
    }

    /// First entity of type `type_name` that `key` would collide with at `at`
    pub fn meet(&self, key: EntityKey, at: Option<Vec2>, type_name: &str) -> Result<Option<EntityKey>> {
        let hits = self.scan_entities(key, at, true, |other| other.type_name() == type_name)?;
        Ok(hits.first().copied())
    }

    /// Every entity of type `type_name` that `key` would collide with at `at`
    pub fn meet_all(&self, key: EntityKey, at: Option<Vec2>, type_name: &str) -> Result<Vec<EntityKey>> {
        self.scan_entities(key, at, false, |other| other.type_name() == type_name)
    }

    /// First static tile passing `filter` that `key` would collide with at `at`
    pub fn tile(&self, key: EntityKey, at: Option<Vec2>, filter: &TileFilter) -> Result<Option<TileKey>> {
        let hits = self.scan_tiles(key, at, filter, true)?;
        Ok(hits.first().copied())
    }

    /// Every static tile passing `filter` that `key` would collide with at `at`
    pub fn tile_all(&self, key: EntityKey, at: Option<Vec2>, filter: &TileFilter) -> Result<Vec<TileKey>> {
        self.scan_tiles(key, at, filter, false)
    }

    /// Direct narrow-phase test between two entities at their current poses
    pub fn collide_entities(&self, a: EntityKey, b: EntityKey) -> Result<bool> {
        let segments = self.config.ellipse_segments;
        let a = self.entity(a)?.world_shape(segments);
        let b = self.entity(b)?.world_shape(segments);
        Ok(collide(a, b))
    }

    /// Shape of `key` at `at`, with the position its cells are looked up by
    fn subject_shape(&self, key: EntityKey, at: Option<Vec2>) -> Result<(Vec2, Cow<'_, WorldShape>)> {
        let entity = self.entities.get(key).ok_or(PlaceError::StaleEntity(key))?;
        let position = at.unwrap_or_else(|| entity.position());
        Ok((position, entity.shape_at(at, self.config.ellipse_segments)))
    }

    fn scan_entities(
        &self,
        key: EntityKey,
        at: Option<Vec2>,
        first_only: bool,
        filter: impl Fn(&Entity) -> bool,
    ) -> Result<Vec<EntityKey>> {
        let (position, shape) = self.subject_shape(key, at)?;
        let cells = self.entity_grid.cells_for(position);
        let segments = self.config.ellipse_segments;

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for candidate in self.entity_grid.candidates(&cells) {
            if candidate == key || !seen.insert(candidate) {
                continue;
            }
            let Some(other) = self.entities.get(candidate) else {
                continue;
            };
            if filter(other) && collide(&shape, other.world_shape(segments)) {
                hits.push(candidate);
                if first_only {
                    break;
                }
            }
        }
        Ok(hits)
    }

    fn scan_tiles(&self, key: EntityKey, at: Option<Vec2>, filter: &TileFilter, first_only: bool) -> Result<Vec<TileKey>> {
        let (position, shape) = self.subject_shape(key, at)?;
        let cells = self.tile_grid.cells_for(position);

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for candidate in self.tile_grid.candidates(&cells) {
            if !seen.insert(candidate) {
                continue;
            }
            let Some(tile) = self.tiles.get(candidate) else {
                continue;
            };
            if filter.matches(tile) && collide(&shape, tile.shape()) {
                hits.push(candidate);
                if first_only {
                    break;
                }
            }
        }
        Ok(hits)
    }
}

//! Stepped movement and goal seeking
//!
//! Movement is sampled, not swept: the entity advances in steps no longer than
//! the precision and every step is tested before it is committed. An obstacle
//! thicker than one step can therefore never be skipped. Each step is placed
//! relative to where the move started, and a single call never takes more
//! than `max_move_steps` steps.

use super::{AxisObstacles, Obstacle, TileFilter};
use crate::error::Result;
use crate::foundation::math::{distance, from_direction, point_direction, Vec2};
use crate::foundation::time::PeriodicTicker;
use crate::world::{EntityKey, PlaceWorld};
use std::time::Duration;

/// Shared steering state for obstacle avoidance
///
/// The multiplier decides whether the avoidance search of `go` tries left or
/// right first. It flips sign once per period so that entities stuck against
/// the same obstacle do not keep making the same choice.
#[derive(Debug, Clone)]
pub struct Steering {
    multiplier: f32,
    ticker: PeriodicTicker,
}

impl Steering {
    /// Create steering state flipping once per `period`
    pub fn new(period: Duration) -> Self {
        Self {
            multiplier: 1.0,
            ticker: PeriodicTicker::new(period),
        }
    }

    /// Current multiplier, `1.0` or `-1.0`
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Feed elapsed time, flipping once per elapsed period
    pub fn advance(&mut self, delta: Duration) {
        if self.ticker.advance(delta) % 2 == 1 {
            self.multiplier = -self.multiplier;
        }
    }

    /// Number of whole periods elapsed so far
    pub fn elapsed_periods(&self) -> u64 {
        self.ticker.fire_count()
    }
}

impl PlaceWorld {
    /// Step `key` along `direction` (degrees) for `length`, stopping at the first obstacle
    ///
    /// Each step is tested against entities of `group` and against tiles of
    /// `group`. Steps before the obstacle are committed. Returns `None` when
    /// the whole length was travelled. A negative length moves backwards.
    pub fn move_along(
        &mut self,
        key: EntityKey,
        direction: f32,
        length: f32,
        group: Option<&str>,
        precision: Option<f32>,
    ) -> Result<Option<Obstacle>> {
        let precision = self.step_size(precision);
        self.entity(key)?;
        if length == 0.0 || !length.is_finite() {
            log::trace!("Ignoring move of length {} for {:?}", length, key);
            return Ok(None);
        }
        let (direction, length) = if length < 0.0 {
            (direction + 180.0, -length)
        } else {
            (direction, length)
        };

        let unit = from_direction(1.0, direction);
        let start = self.entity(key)?.position();
        let (steps, step) = self.step_plan(length, precision);
        for i in 1..=steps {
            let next = start + unit * (step * i as f32).min(length);
            if let Some(obstacle) = self.obstruction(key, next, group)? {
                return Ok(Some(obstacle));
            }
            self.entity_mut(key)?.set_position(next);
        }
        if step * (steps as f32) < length {
            let next = start + unit * length;
            if let Some(obstacle) = self.obstruction(key, next, group)? {
                return Ok(Some(obstacle));
            }
            self.entity_mut(key)?.set_position(next);
        }
        Ok(None)
    }

    /// Move `key` by `dx` then by `dy`, each axis swept on its own
    ///
    /// Blocking one axis does not stop the other, so an entity pushed into a
    /// wall diagonally slides along it. Whole steps are taken first, then the
    /// fractional remainder if it is free. Returns what blocked each axis, or
    /// `None` if neither was blocked.
    pub fn move_by_axes(
        &mut self,
        key: EntityKey,
        dx: f32,
        dy: f32,
        group: Option<&str>,
        precision: Option<f32>,
    ) -> Result<Option<AxisObstacles>> {
        let precision = self.step_size(precision);
        let obstacles = AxisObstacles {
            x: self.sweep_axis(key, Vec2::x(), dx, group, precision)?,
            y: self.sweep_axis(key, Vec2::y(), dy, group, precision)?,
        };
        Ok(obstacles.any().then_some(obstacles))
    }

    /// Move `key` up to `length` towards `target`, steering around entities of `group`
    ///
    /// Snaps to the target when it is within reach and free. Otherwise tries
    /// the direct bearing, then deviations of increasing angle alternating
    /// between sides, committing the first free candidate and turning the
    /// entity to face it. Returns whether the entity moved.
    pub fn go(&mut self, key: EntityKey, target: Vec2, length: f32, group: Option<&str>) -> Result<bool> {
        let position = self.entity(key)?.position();
        if !(length > 0.0) || !length.is_finite() {
            log::trace!("Ignoring go of length {} for {:?}", length, key);
            return Ok(false);
        }
        let bearing = point_direction(position, target);

        if distance(position, target) <= length && self.free(key, Some(target), group)? {
            let entity = self.entity_mut(key)?;
            if target != position {
                entity.direction = bearing;
            }
            entity.set_position(target);
            return Ok(true);
        }

        let multiplier = self.steering.multiplier();
        let mut candidates = vec![bearing];
        for angle in self.config.avoidance_angles() {
            for side in [1.0, -1.0] {
                candidates.push(bearing + angle * multiplier * side);
            }
        }

        for direction in candidates {
            let next = position + from_direction(length, direction);
            if self.free(key, Some(next), group)? {
                let entity = self.entity_mut(key)?;
                entity.set_position(next);
                entity.direction = direction.rem_euclid(360.0);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn sweep_axis(
        &mut self,
        key: EntityKey,
        axis: Vec2,
        delta: f32,
        group: Option<&str>,
        precision: f32,
    ) -> Result<Option<Obstacle>> {
        if delta == 0.0 || !delta.is_finite() {
            return Ok(None);
        }
        let heading = axis * delta.signum();
        let length = delta.abs();
        let start = self.entity(key)?.position();
        let (steps, step) = self.step_plan(length, precision);

        for i in 1..=steps {
            let next = start + heading * (step * i as f32).min(length);
            if let Some(obstacle) = self.obstruction(key, next, group)? {
                return Ok(Some(obstacle));
            }
            self.entity_mut(key)?.set_position(next);
        }

        if step * (steps as f32) < length {
            let next = start + heading * length;
            if self.obstruction(key, next, group)?.is_none() {
                self.entity_mut(key)?.set_position(next);
            }
        }
        Ok(None)
    }

    fn obstruction(&self, key: EntityKey, at: Vec2, group: Option<&str>) -> Result<Option<Obstacle>> {
        if let Some(other) = self.occupied(key, Some(at), group)? {
            return Ok(Some(Obstacle::Entity(other)));
        }
        let tile = self.tile(key, Some(at), &TileFilter::from(group))?;
        Ok(tile.map(Obstacle::Tile))
    }

    /// Whole step count and step length for a move of `length`
    fn step_plan(&self, length: f32, precision: f32) -> (u64, f32) {
        let limit = self.config.max_move_steps as f32;
        let step = if length / precision > limit {
            log::debug!("Move of {} coarsened from step {} to {}", length, precision, length / limit);
            length / limit
        } else {
            precision
        };
        ((length / step).floor() as u64, step)
    }

    fn step_size(&self, precision: Option<f32>) -> f32 {
        precision
            .map(f32::abs)
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(self.config.default_precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceConfig;
    use crate::geometry::ShapeDescriptor;
    use crate::world::{EntityDesc, RoomKey, TileDesc};
    use approx::assert_relative_eq;

    fn world() -> (PlaceWorld, RoomKey) {
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 64.0)).unwrap();
        let room = world.add_room("test");
        (world, room)
    }

    fn boxed(world: &mut PlaceWorld, room: RoomKey, type_name: &str, x: f32, y: f32, size: f32) -> EntityKey {
        let desc = EntityDesc::new(type_name, x, y).with_shape(ShapeDescriptor::centered_rect(size, size));
        world.spawn(room, desc).unwrap()
    }

    #[test]
    fn test_steering_flips_on_odd_fire_counts() {
        let mut steering = Steering::new(Duration::from_millis(100));
        steering.advance(Duration::from_millis(250));
        assert_relative_eq!(steering.multiplier(), 1.0);
        steering.advance(Duration::from_millis(50));
        assert_relative_eq!(steering.multiplier(), -1.0);
        assert_eq!(steering.elapsed_periods(), 3);
    }

    #[test]
    fn test_move_along_stops_before_tile() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();
        let tilemap = world
            .add_tilemap(room, 0, None, vec![TileDesc::new(50.0, -10.0, 10.0, 20.0)])
            .unwrap();
        world.enable_tilemap_collisions(tilemap, None).unwrap();

        let obstacle = world.move_along(hero, 0.0, 100.0, None, None).unwrap();
        assert!(matches!(obstacle, Some(Obstacle::Tile(_))));
        assert_relative_eq!(world.entity(hero).unwrap().position().x, 49.0);
    }

    #[test]
    fn test_move_along_unobstructed_and_backwards() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();

        assert_eq!(world.move_along(hero, 0.0, 10.5, None, Some(2.0)).unwrap(), None);
        assert_relative_eq!(world.entity(hero).unwrap().position().x, 10.5, epsilon = 1e-4);

        assert_eq!(world.move_along(hero, 0.0, -4.0, None, None).unwrap(), None);
        assert_relative_eq!(world.entity(hero).unwrap().position().x, 6.5, epsilon = 1e-4);
    }

    #[test]
    fn test_long_moves_and_tiny_precision_terminate() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();

        assert_eq!(world.move_along(hero, 0.0, 3.0e7, None, None).unwrap(), None);
        assert_relative_eq!(world.entity(hero).unwrap().position().x, 3.0e7, max_relative = 1e-6);

        world.entity_mut(hero).unwrap().set_position(Vec2::zeros());
        assert_eq!(world.move_along(hero, 0.0, 100.0, None, Some(1e-6)).unwrap(), None);
        assert_relative_eq!(world.entity(hero).unwrap().position().x, 100.0, epsilon = 1e-3);

        world.entity_mut(hero).unwrap().set_position(Vec2::zeros());
        assert_eq!(world.move_by_axes(hero, -3.0e7, 100.0, None, Some(1e-6)).unwrap(), None);
        let position = world.entity(hero).unwrap().position();
        assert_relative_eq!(position.x, -3.0e7, max_relative = 1e-6);
        assert_relative_eq!(position.y, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_coarsened_steps_still_stop_at_tile() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();
        let tilemap = world
            .add_tilemap(room, 0, None, vec![TileDesc::new(50.0, -10.0, 10.0, 20.0)])
            .unwrap();
        world.enable_tilemap_collisions(tilemap, None).unwrap();

        let obstacle = world.move_along(hero, 0.0, 100.0, None, Some(1e-6)).unwrap();
        assert!(matches!(obstacle, Some(Obstacle::Tile(_))));
        let x = world.entity(hero).unwrap().position().x;
        assert!(x < 50.0 && x > 49.99, "stopped at {x}");
    }

    #[test]
    fn test_move_along_zero_length_is_a_no_op() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 3.0, 3.0)).unwrap();
        assert_eq!(world.move_along(hero, 45.0, 0.0, None, None).unwrap(), None);
        assert_eq!(world.entity(hero).unwrap().position(), Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_move_by_axes_slides_along_wall() {
        let (mut world, room) = world();
        let hero = boxed(&mut world, room, "Hero", 0.0, 0.0, 8.0);
        let wall = boxed(&mut world, room, "Wall", 20.0, 0.0, 16.0);

        let blocked = world.move_by_axes(hero, 20.0, 5.0, None, None).unwrap();
        assert_eq!(
            blocked,
            Some(AxisObstacles {
                x: Some(Obstacle::Entity(wall)),
                y: None
            })
        );
        let position = world.entity(hero).unwrap().position();
        assert_relative_eq!(position.x, 8.0);
        assert_relative_eq!(position.y, 5.0);
    }

    #[test]
    fn test_move_by_axes_takes_fractional_remainder() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();
        assert_eq!(world.move_by_axes(hero, 2.5, -1.25, None, None).unwrap(), None);
        let position = world.entity(hero).unwrap().position();
        assert_relative_eq!(position.x, 2.5);
        assert_relative_eq!(position.y, -1.25);
    }

    #[test]
    fn test_go_snaps_to_free_target() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();
        assert!(world.go(hero, Vec2::new(3.0, -4.0), 5.0, None).unwrap());
        assert_eq!(world.entity(hero).unwrap().position(), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_go_steps_towards_target() {
        let (mut world, room) = world();
        let hero = world.spawn(room, EntityDesc::new("Hero", 0.0, 0.0)).unwrap();
        assert!(world.go(hero, Vec2::new(100.0, 0.0), 10.0, None).unwrap());
        let hero = world.entity(hero).unwrap();
        assert_relative_eq!(hero.position().x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(hero.position().y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(hero.direction, 0.0);
    }

    #[test]
    fn test_go_avoids_obstacle_and_side_flips() {
        let (mut world, room) = world();
        let hero = boxed(&mut world, room, "Hero", 0.0, 0.0, 8.0);
        boxed(&mut world, room, "Wall", 16.0, 0.0, 16.0);

        assert!(world.go(hero, Vec2::new(100.0, 0.0), 10.0, None).unwrap());
        let position = world.entity(hero).unwrap().position();
        assert_relative_eq!(position.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(position.y, -10.0, epsilon = 1e-4);
        assert_relative_eq!(world.entity(hero).unwrap().direction, 90.0, epsilon = 1e-3);

        world.entity_mut(hero).unwrap().set_position(Vec2::zeros());
        world.advance_time(Duration::from_millis(789));
        assert!(world.go(hero, Vec2::new(100.0, 0.0), 10.0, None).unwrap());
        let position = world.entity(hero).unwrap().position();
        assert_relative_eq!(position.y, 10.0, epsilon = 1e-4);
        assert_relative_eq!(world.entity(hero).unwrap().direction, 270.0, epsilon = 1e-3);
    }

    #[test]
    fn test_go_stays_put_when_boxed_in() {
        let (mut world, room) = world();
        let hero = boxed(&mut world, room, "Hero", 0.0, 0.0, 8.0);
        boxed(&mut world, room, "Cage", 0.0, 0.0, 60.0);
        assert!(!world.go(hero, Vec2::new(100.0, 0.0), 10.0, None).unwrap());
        assert_eq!(world.entity(hero).unwrap().position(), Vec2::zeros());
    }
}

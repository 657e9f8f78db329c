//! Traces: ad-hoc shapes tested against the entity index
//!
//! A trace is not tied to any entity. Probes that fit inside one grid cell
//! are looked up through the hash around the center of their bounding box.
//! Larger probes cannot trust the hash neighbourhood and scan every live
//! entity instead.

use super::group_matches;
use crate::foundation::math::{distance, from_direction, Vec2};
use crate::geometry::{collide, Aabb, Circle, Polyline, Segment, WorldShape};
use crate::world::{EntityKey, PlaceWorld};
use std::collections::HashSet;

impl PlaceWorld {
    /// First entity of `group` colliding with `shape`
    pub fn trace_custom(&self, shape: &WorldShape, group: Option<&str>) -> Option<EntityKey> {
        self.trace_hits(shape, group, true).first().copied()
    }

    /// Every entity of `group` colliding with `shape`
    pub fn trace_custom_all(&self, shape: &WorldShape, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_hits(shape, group, false)
    }

    /// First entity of `group` touched by the segment from `start` to `end`
    pub fn trace_line(&self, start: Vec2, end: Vec2, group: Option<&str>) -> Option<EntityKey> {
        self.trace_custom(&WorldShape::Segment(Segment::new(start, end)), group)
    }

    /// Every entity of `group` touched by the segment, nearest to `start` first
    pub fn trace_line_all(&self, start: Vec2, end: Vec2, group: Option<&str>) -> Vec<EntityKey> {
        let mut hits = self.trace_custom_all(&WorldShape::Segment(Segment::new(start, end)), group);
        self.sort_by_distance(&mut hits, start);
        hits
    }

    /// First entity of `group` on a ray of `length` cast from `origin` at `direction` degrees
    pub fn trace_ray(&self, origin: Vec2, direction: f32, length: f32, group: Option<&str>) -> Option<EntityKey> {
        self.trace_line(origin, origin + from_direction(length, direction), group)
    }

    /// Every entity of `group` on the ray, nearest to `origin` first
    pub fn trace_ray_all(&self, origin: Vec2, direction: f32, length: f32, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_line_all(origin, origin + from_direction(length, direction), group)
    }

    /// First entity of `group` overlapping `rect`
    pub fn trace_rect(&self, rect: Aabb, group: Option<&str>) -> Option<EntityKey> {
        self.trace_custom(&WorldShape::Rect(rect), group)
    }

    /// Every entity of `group` overlapping `rect`
    pub fn trace_rect_all(&self, rect: Aabb, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_custom_all(&WorldShape::Rect(rect), group)
    }

    /// First entity of `group` touching the circle
    pub fn trace_circle(&self, center: Vec2, radius: f32, group: Option<&str>) -> Option<EntityKey> {
        self.trace_custom(&WorldShape::Circle(Circle::new(center, radius)), group)
    }

    /// Every entity of `group` touching the circle
    pub fn trace_circle_all(&self, center: Vec2, radius: f32, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_custom_all(&WorldShape::Circle(Circle::new(center, radius)), group)
    }

    /// First entity of `group` touching the polyline through `points`
    pub fn trace_polyline(&self, points: &[Vec2], closed: bool, group: Option<&str>) -> Option<EntityKey> {
        self.trace_custom(&polyline(points, closed), group)
    }

    /// Every entity of `group` touching the polyline through `points`
    pub fn trace_polyline_all(&self, points: &[Vec2], closed: bool, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_custom_all(&polyline(points, closed), group)
    }

    /// First entity of `group` containing `point`
    pub fn trace_point(&self, point: Vec2, group: Option<&str>) -> Option<EntityKey> {
        self.trace_custom(&WorldShape::Circle(Circle::point(point)), group)
    }

    /// Every entity of `group` containing `point`
    pub fn trace_point_all(&self, point: Vec2, group: Option<&str>) -> Vec<EntityKey> {
        self.trace_custom_all(&WorldShape::Circle(Circle::point(point)), group)
    }

    /// Whether a probe with these bounds is too large for a hash lookup
    pub fn is_oversized(&self, bounds: &Aabb) -> bool {
        bounds.width() > self.config.grid_x || bounds.height() > self.config.grid_y
    }

    fn trace_hits(&self, shape: &WorldShape, group: Option<&str>, first_only: bool) -> Vec<EntityKey> {
        let bounds = shape.aabb();
        let segments = self.config.ellipse_segments;
        let mut hits = Vec::new();
        let mut test = |key: EntityKey| {
            let Some(entity) = self.entities.get(key) else {
                return false;
            };
            if group_matches(group, entity.group()) && collide(shape, entity.world_shape(segments)) {
                hits.push(key);
                return first_only;
            }
            false
        };

        if self.is_oversized(&bounds) {
            log::trace!(
                "Oversized trace probe {}x{}, scanning all entities",
                bounds.width(),
                bounds.height()
            );
            for key in self.entities.keys() {
                if test(key) {
                    break;
                }
            }
        } else {
            let cells = self.entity_grid.cells_for(bounds.center());
            let mut seen = HashSet::new();
            for key in self.entity_grid.candidates(&cells) {
                if seen.insert(key) && test(key) {
                    break;
                }
            }
        }
        hits
    }

    fn sort_by_distance(&self, keys: &mut [EntityKey], origin: Vec2) {
        let distance_of = |key: &EntityKey| {
            self.entities
                .get(*key)
                .map_or(f32::INFINITY, |entity| distance(origin, entity.position()))
        };
        keys.sort_by(|a, b| distance_of(a).total_cmp(&distance_of(b)));
    }
}

fn polyline(points: &[Vec2], closed: bool) -> WorldShape {
    WorldShape::Polyline(Polyline::new(points.to_vec(), closed))
}

#[cfg(test)]
mod tests {
    use crate::config::PlaceConfig;
    use crate::foundation::math::Vec2;
    use crate::geometry::{Aabb, ShapeDescriptor};
    use crate::world::{EntityDesc, EntityKey, PlaceWorld, RoomKey};

    fn world() -> (PlaceWorld, RoomKey) {
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 64.0)).unwrap();
        let room = world.add_room("test");
        (world, room)
    }

    fn boxed(world: &mut PlaceWorld, room: RoomKey, x: f32, y: f32, group: &str) -> EntityKey {
        let desc = EntityDesc::new("Box", x, y)
            .with_shape(ShapeDescriptor::centered_rect(8.0, 8.0))
            .with_group(group);
        world.spawn(room, desc).unwrap()
    }

    #[test]
    fn test_trace_line_all_is_sorted_from_start() {
        let (mut world, room) = world();
        let far = boxed(&mut world, room, 40.0, 0.0, "Enemy");
        let near = boxed(&mut world, room, 10.0, 0.0, "Enemy");
        let mid = boxed(&mut world, room, 25.0, 0.0, "Enemy");
        boxed(&mut world, room, 25.0, 30.0, "Enemy");

        assert_eq!(
            world.trace_line_all(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), None),
            vec![near, mid, far]
        );
        assert_eq!(
            world.trace_line_all(Vec2::new(50.0, 0.0), Vec2::new(0.0, 0.0), None),
            vec![far, mid, near]
        );
    }

    #[test]
    fn test_trace_ray_uses_bearing() {
        let (mut world, room) = world();
        let above = boxed(&mut world, room, 0.0, -20.0, "Enemy");
        boxed(&mut world, room, 20.0, 0.0, "Enemy");

        assert_eq!(world.trace_ray(Vec2::zeros(), 90.0, 30.0, None), Some(above));
        assert_eq!(world.trace_ray_all(Vec2::zeros(), 90.0, 30.0, None), vec![above]);
        assert_eq!(world.trace_ray(Vec2::zeros(), 90.0, 10.0, None), None);
    }

    #[test]
    fn test_trace_shapes_respect_group() {
        let (mut world, room) = world();
        let enemy = boxed(&mut world, room, 10.0, 10.0, "Enemy");
        let friend = boxed(&mut world, room, 14.0, 10.0, "Friend");

        let area = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0));
        assert_eq!(world.trace_rect(area, Some("Friend")), Some(friend));
        assert_eq!(world.trace_rect_all(area, None).len(), 2);
        assert_eq!(world.trace_circle(Vec2::new(0.0, 10.0), 7.0, None), Some(enemy));
        assert_eq!(world.trace_circle_all(Vec2::new(0.0, 10.0), 5.0, None), Vec::new());
        assert_eq!(world.trace_point_all(Vec2::new(12.0, 10.0), None).len(), 2);
        assert_eq!(world.trace_point(Vec2::new(7.0, 10.0), Some("Enemy")), Some(enemy));
        assert_eq!(world.trace_point(Vec2::new(7.0, 10.0), Some("Friend")), None);
    }

    #[test]
    fn test_closed_polyline_finds_enclosed_entity() {
        let (mut world, room) = world();
        let inside = world.spawn(room, EntityDesc::new("Gem", 10.0, 10.0)).unwrap();
        let triangle = [Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(0.0, 30.0)];

        assert_eq!(world.trace_polyline(&triangle, true, None), Some(inside));
        assert_eq!(world.trace_polyline(&triangle, false, None), None);
    }

    #[test]
    fn test_oversized_probe_scans_everything() {
        let (mut world, room) = world();
        let far = boxed(&mut world, room, 1000.0, 0.0, "Enemy");
        let area = Aabb::new(Vec2::new(-10.0, -10.0), Vec2::new(1010.0, 10.0));
        assert!(world.is_oversized(&area));
        assert_eq!(world.trace_rect(area, None), Some(far));
    }
}

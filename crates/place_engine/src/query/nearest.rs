//! Nearest and furthest entity of a type
//!
//! These scan the type registry linearly; the spatial hash is not consulted.

use crate::foundation::math::Vec2;
use crate::world::{EntityKey, PlaceWorld};

impl PlaceWorld {
    /// Entity of type `type_name` closest to `point`
    ///
    /// Ties go to the entity created first. The distance is kept for
    /// [`PlaceWorld::last_distance`].
    pub fn nearest(&self, point: Vec2, type_name: &str) -> Option<EntityKey> {
        self.extreme_of_type(point, type_name, |candidate, best| candidate < best)
    }

    /// Entity of type `type_name` furthest from `point`
    pub fn furthest(&self, point: Vec2, type_name: &str) -> Option<EntityKey> {
        self.extreme_of_type(point, type_name, |candidate, best| candidate > best)
    }

    fn extreme_of_type(&self, point: Vec2, type_name: &str, better: impl Fn(f32, f32) -> bool) -> Option<EntityKey> {
        let mut best: Option<(EntityKey, f32)> = None;
        for &key in self.entities_of_type(type_name) {
            let Some(entity) = self.entities.get(key) else {
                continue;
            };
            let dist = entity.distance_to(point);
            if best.map_or(true, |(_, best_dist)| better(dist, best_dist)) {
                best = Some((key, dist));
            }
        }
        self.last_distance.set(best.map(|(_, dist)| dist));
        best.map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PlaceConfig;
    use crate::foundation::math::Vec2;
    use crate::world::{EntityDesc, PlaceWorld};
    use approx::assert_relative_eq;

    #[test]
    fn test_nearest_and_furthest() {
        let mut world = PlaceWorld::new(PlaceConfig::default()).unwrap();
        let room = world.add_room("test");
        let near = world.spawn(room, EntityDesc::new("Foo", 3.0, 4.0)).unwrap();
        let far = world.spawn(room, EntityDesc::new("Foo", -30.0, 40.0)).unwrap();
        world.spawn(room, EntityDesc::new("Bar", 1.0, 0.0)).unwrap();

        assert_eq!(world.nearest(Vec2::zeros(), "Foo"), Some(near));
        assert_relative_eq!(world.last_distance().unwrap(), 5.0);
        assert_eq!(world.furthest(Vec2::zeros(), "Foo"), Some(far));
        assert_relative_eq!(world.last_distance().unwrap(), 50.0);
    }

    #[test]
    fn test_ties_go_to_first_created() {
        let mut world = PlaceWorld::new(PlaceConfig::default()).unwrap();
        let room = world.add_room("test");
        let first = world.spawn(room, EntityDesc::new("Foo", 10.0, 0.0)).unwrap();
        world.spawn(room, EntityDesc::new("Foo", -10.0, 0.0)).unwrap();

        assert_eq!(world.nearest(Vec2::zeros(), "Foo"), Some(first));
        assert_eq!(world.furthest(Vec2::zeros(), "Foo"), Some(first));
    }

    #[test]
    fn test_missing_type_clears_distance() {
        let mut world = PlaceWorld::new(PlaceConfig::default()).unwrap();
        let room = world.add_room("test");
        world.spawn(room, EntityDesc::new("Foo", 1.0, 0.0)).unwrap();
        world.nearest(Vec2::zeros(), "Foo");
        assert!(world.last_distance().is_some());

        assert_eq!(world.nearest(Vec2::zeros(), "Missing"), None);
        assert_eq!(world.last_distance(), None);
    }
}

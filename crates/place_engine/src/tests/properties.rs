//! Index and query invariants over seeded random worlds

use crate::config::PlaceConfig;
use crate::foundation::math::Vec2;
use crate::geometry::{Pose, ShapeDescriptor};
use crate::query::TileFilter;
use crate::world::{EntityDesc, EntityKey, PlaceWorld, RoomKey, TileDesc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_shape(rng: &mut StdRng) -> ShapeDescriptor {
    match rng.gen_range(0..4) {
        0 => ShapeDescriptor::Point,
        1 => ShapeDescriptor::circle(rng.gen_range(2.0..20.0)),
        2 => ShapeDescriptor::centered_rect(rng.gen_range(2.0..40.0), rng.gen_range(2.0..40.0)),
        _ => ShapeDescriptor::LineStrip {
            points: vec![Vec2::new(-10.0, -5.0), Vec2::new(12.0, 0.0), Vec2::new(-4.0, 9.0)],
            closed: true,
        },
    }
}

fn populate(world: &mut PlaceWorld, room: RoomKey, rng: &mut StdRng, count: usize, extent: f32) -> Vec<EntityKey> {
    (0..count)
        .map(|i| {
            let desc = EntityDesc::new(
                if i % 3 == 0 { "Enemy" } else { "Prop" },
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
            .with_shape(random_shape(rng))
            .with_rotation(if rng.gen_bool(0.3) { rng.gen_range(0.0..360.0) } else { 0.0 });
            let desc = if rng.gen_bool(0.5) { desc.with_group("Solid") } else { desc };
            world.spawn(room, desc).unwrap()
        })
        .collect()
}

fn assert_hashed_where_it_stands(world: &PlaceWorld) {
    let grid = world.entity_grid();
    assert!(grid.is_consistent());
    assert_eq!(grid.len(), world.entity_count());
    for (key, entity) in world.entities() {
        let expected = grid.cells_for(entity.position());
        assert!(matches!(expected.len(), 1 | 2 | 4));
        assert_eq!(grid.cells_of(key), Some(&expected));
        for cell in expected.iter() {
            assert!(grid.bucket(cell).contains(&key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_symmetry() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 48.0)).unwrap();
        let room = world.add_room("props");
        populate(&mut world, room, &mut rng, 150, 400.0);

        // Positions on cell centers and boundaries
        for &(x, y) in &[(0.0, 0.0), (64.0, 0.0), (32.0, 24.0), (-64.0, 48.0), (-32.0, -24.0)] {
            world.spawn(room, EntityDesc::new("Grid", x, y)).unwrap();
        }
        assert_hashed_where_it_stands(&world);
    }

    #[test]
    fn test_occupied_free_duality() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 64.0)).unwrap();
        let room = world.add_room("props");
        let keys = populate(&mut world, room, &mut rng, 80, 150.0);

        for _ in 0..400 {
            let key = keys[rng.gen_range(0..keys.len())];
            let at = rng
                .gen_bool(0.7)
                .then(|| Vec2::new(rng.gen_range(-150.0..150.0), rng.gen_range(-150.0..150.0)));
            let group = [None, Some("Solid"), Some("Missing")][rng.gen_range(0..3)];

            let occupied = world.occupied(key, at, group).unwrap();
            let free = world.free(key, at, group).unwrap();
            assert_eq!(occupied.is_some(), !free);
            assert_eq!(occupied.is_some(), !world.occupied_all(key, at, group).unwrap().is_empty());
        }
    }

    #[test]
    fn test_shape_resolution_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let shape = random_shape(&mut rng);
            let pose = Pose {
                position: Vec2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)),
                scale: Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
                rotation: rng.gen_range(-360.0..360.0),
            };
            assert_eq!(shape.resolve(&pose, 16), shape.resolve(&pose, 16));
        }

        let mut world = PlaceWorld::new(PlaceConfig::default()).unwrap();
        let room = world.add_room("props");
        let key = populate(&mut world, room, &mut rng, 1, 10.0)[0];
        let first = world.entity(key).unwrap().world_shape(16).clone();
        assert_eq!(world.entity(key).unwrap().world_shape(16), &first);
        world.entity_mut(key).unwrap().invalidate_shape();
        assert_eq!(world.entity(key).unwrap().world_shape(16), &first);
    }

    #[test]
    fn test_move_along_never_tunnels() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 64.0)).unwrap();
            let room = world.add_room("corridor");
            let thickness = rng.gen_range(4.0..12.0);
            let precision = rng.gen_range(0.5..thickness * 0.9);
            let wall = (-20..20)
                .map(|i| TileDesc::new(100.0, i as f32 * 16.0, thickness, 16.0))
                .collect();
            let tilemap = world.add_tilemap(room, 0, None, wall).unwrap();
            world.enable_tilemap_collisions(tilemap, None).unwrap();

            let start_y = rng.gen_range(-200.0..200.0);
            let hero = world
                .spawn(
                    room,
                    EntityDesc::new("Hero", 0.0, start_y).with_shape(ShapeDescriptor::centered_rect(4.0, 4.0)),
                )
                .unwrap();
            let direction = rng.gen_range(-30.0..30.0);

            assert!(world.tile(hero, None, &TileFilter::Any).unwrap().is_none());
            let obstacle = world.move_along(hero, direction, 400.0, None, Some(precision)).unwrap();
            assert!(obstacle.is_some());

            let position = world.entity(hero).unwrap().position();
            assert!(position.x + 2.0 <= 100.0 + 1e-3);
            assert!(world.tile(hero, None, &TileFilter::Any).unwrap().is_none());
            assert!(world.free(hero, None, None).unwrap());
        }
    }

    #[test]
    fn test_index_consistency_under_churn() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(128.0, 128.0)).unwrap();
        let room = world.add_room("churn");
        let keys = populate(&mut world, room, &mut rng, 200, 2000.0);

        for _ in 0..30 {
            for &key in &keys {
                let delta = Vec2::new(rng.gen_range(-300.0..300.0), rng.gen_range(-300.0..300.0));
                world.entity_mut(key).unwrap().translate(delta);
            }
            world.end_frame();
            assert_hashed_where_it_stands(&world);
        }

        let (doomed, survivors) = keys.split_at(keys.len() / 2);
        for &key in doomed {
            world.destroy(key).unwrap();
        }
        let report = world.end_frame();
        assert_eq!(report.removed, doomed.len());
        assert_hashed_where_it_stands(&world);
        for &key in doomed {
            assert!(!world.entity_grid().contains(key));
            assert!(!world.contains(key));
        }
        for &key in survivors {
            assert!(world.entity_grid().contains(key));
        }
        let typed: usize = ["Enemy", "Prop"].iter().map(|t| world.entities_of_type(t).len()).sum();
        assert_eq!(typed, survivors.len());
    }
}

//! Headless sandbox for the place engine
//!
//! Loads a small level, then runs a fixed-step loop where a hero walks back
//! and forth under gravity, slimes chase it around the walls, and the hero
//! zaps whatever stands in front of it. Query results are logged.

use place_engine::foundation::logging;
use place_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const LEVEL: &str = r#"
LevelData(
    name: "sandbox",
    tile_depth: -100,
    tiles: [
        (x: 0.0, y: 288.0, width: 640.0, height: 32.0),
        (x: 0.0, y: 0.0, width: 32.0, height: 288.0),
        (x: 608.0, y: 0.0, width: 32.0, height: 288.0),
        (x: 256.0, y: 256.0, width: 32.0, height: 32.0, group: Some("Crate")),
    ],
    spawns: [
        (type_name: "Hero", x: 96.0, y: 200.0, shape: {"type": "rect", "left": 8.0, "top": 24.0, "right": 8.0, "bottom": 0.0}),
        (type_name: "Slime", x: 480.0, y: 272.0, shape: {"type": "circle", "radius": 8.0}, group: Some("Enemy")),
        (type_name: "Slime", x: 540.0, y: 272.0, shape: {"type": "circle", "radius": 8.0}, group: Some("Enemy")),
        (type_name: "Coin", x: 200.0, y: 276.0, shape: {"type": "circle", "r": 4.0}),
        (type_name: "Coin", x: 400.0, y: 276.0, shape: {"type": "circle", "r": 4.0}),
        (type_name: "Pillar", x: 380.0, y: 288.0, shape: {"type": "strip", "points": [[-8.0, 0.0], [0.0, -48.0], [8.0, 0.0]], "closedStrip": true}, group: Some("Solid")),
    ],
)
"#;

const FRAMES: u32 = 900;
const FRAME_TIME: Duration = Duration::from_millis(16);
const WALK_SPEED: f32 = 2.0;
const GRAVITY: f32 = 4.0;
const SLIME_SPEED: f32 = 1.0;
const ZAP_RANGE: f32 = 96.0;
const ZAP_INTERVAL: u32 = 45;

/// Sandbox errors
#[derive(Error, Debug)]
enum SandboxError {
    #[error("Engine error: {0}")]
    Engine(#[from] PlaceError),

    #[error("Level data error: {0}")]
    Level(#[from] ron::error::SpannedError),

    #[error("Level has no {0}")]
    Missing(&'static str),
}

/// Level file as written by the editor
#[derive(Debug, Deserialize)]
struct LevelData {
    name: String,
    tile_depth: i32,
    tiles: Vec<TileDesc>,
    spawns: Vec<SpawnData>,
}

/// A single entity placement
#[derive(Debug, Deserialize)]
struct SpawnData {
    type_name: String,
    x: f32,
    y: f32,
    #[serde(default)]
    shape: ShapeDescriptor,
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Default)]
struct Stats {
    hero_blocked: u32,
    airborne: u32,
    coins: u32,
    zapped: u32,
    slime_stuck: u32,
    removed: usize,
    reindexed: usize,
}

struct Sandbox {
    world: PlaceWorld,
    hero: EntityKey,
    tile_depth: i32,
    facing: f32,
    rng: StdRng,
    stats: Stats,
}

impl Sandbox {
    fn load(level: &LevelData) -> Result<Self, SandboxError> {
        log::info!("Loading level '{}'", level.name);
        let mut world = PlaceWorld::new(PlaceConfig::with_grid(64.0, 64.0))?;
        let room = world.add_room(level.name.as_str());

        let tilemap = world.add_tilemap(room, level.tile_depth, None, level.tiles.clone())?;
        world.enable_tilemap_collisions(tilemap, Some("Solid"))?;

        let mut hero = None;
        for spawn in &level.spawns {
            let mut desc = EntityDesc::new(spawn.type_name.as_str(), spawn.x, spawn.y).with_shape(spawn.shape.clone());
            if let Some(group) = &spawn.group {
                desc = desc.with_group(group.as_str());
            }
            let key = world.spawn(room, desc)?;
            if spawn.type_name == "Hero" {
                hero = Some(key);
            }
        }

        Ok(Self {
            world,
            hero: hero.ok_or(SandboxError::Missing("hero"))?,
            tile_depth: level.tile_depth,
            facing: 1.0,
            rng: StdRng::seed_from_u64(7),
            stats: Stats::default(),
        })
    }

    fn step(&mut self, frame: u32) -> Result<(), SandboxError> {
        self.update_hero(frame)?;
        self.update_slimes()?;

        let report = self.world.end_frame();
        self.stats.removed += report.removed;
        self.stats.reindexed += report.reindexed;
        self.world.advance_time(FRAME_TIME);
        Ok(())
    }

    fn update_hero(&mut self, frame: u32) -> Result<(), SandboxError> {
        let hero = self.hero;
        let blocked = self
            .world
            .move_by_axes(hero, WALK_SPEED * self.facing, GRAVITY, Some("Solid"), None)?;
        if let Some(AxisObstacles { x: Some(obstacle), .. }) = blocked {
            log::debug!("Hero turned around at {:?}", obstacle);
            self.facing = -self.facing;
            self.stats.hero_blocked += 1;
        }
        let below = self.world.entity(hero)?.position() + Vec2::new(0.0, 1.0);
        if self.world.tile(hero, Some(below), &TileFilter::Depth(self.tile_depth))?.is_none() {
            self.stats.airborne += 1;
        }

        for coin in self.world.meet_all(hero, None, "Coin")? {
            if !self.world.entity(coin)?.is_destroyed() {
                self.world.destroy(coin)?;
                self.stats.coins += 1;
            }
        }

        if frame % ZAP_INTERVAL == 0 {
            let origin = self.world.entity(hero)?.position() - Vec2::new(0.0, 12.0);
            let direction = if self.facing > 0.0 { 0.0 } else { 180.0 };
            for target in self.world.trace_ray_all(origin, direction, ZAP_RANGE, Some("Enemy")) {
                log::info!("Zapped slime at {:?}", self.world.entity(target)?.position());
                self.world.destroy(target)?;
                self.stats.zapped += 1;
            }
        }
        Ok(())
    }

    fn update_slimes(&mut self) -> Result<(), SandboxError> {
        let target = self.world.entity(self.hero)?.position();
        let slimes = self.world.entities_of_type("Slime").to_vec();
        for slime in slimes {
            if self.world.entity(slime)?.is_destroyed() {
                continue;
            }
            let jitter = self.rng.gen_range(0.5..1.5);
            if !self.world.go(slime, target, SLIME_SPEED * jitter, Some("Solid"))? {
                self.stats.slime_stuck += 1;
            }
        }
        Ok(())
    }
}

fn run() -> Result<(), SandboxError> {
    let level: LevelData = ron::from_str(LEVEL)?;
    let mut sandbox = Sandbox::load(&level)?;

    for frame in 0..FRAMES {
        sandbox.step(frame)?;
    }

    let hero = sandbox.world.entity(sandbox.hero)?;
    log::info!("Finished {} frames, hero at {:?}", FRAMES, hero.position());
    log::info!("Stats: {:?}", sandbox.stats);
    if let Some(slime) = sandbox.world.nearest(hero.position(), "Slime") {
        log::info!(
            "Nearest slime {:?} at distance {:.1}",
            slime,
            sandbox.world.last_distance().unwrap_or_default()
        );
    }
    log::info!("Live entities: {}", sandbox.world.entity_count());
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);
    log::info!("Starting place sandbox");

    if let Err(e) = run() {
        log::error!("Sandbox failed: {}", e);
        std::process::exit(1);
    }
}

//! World state: one tile grid, the hero, and pushable blocks.
//!
//! The world owns positions. Every mover reads an object snapshot built
//! right before its own resolution, so later movers see earlier moves
//! from the same frame.

use anyhow::bail;

use crate::config::{Config, MotionConfig};
use crate::domain::entity::{Actor, MovementProperties, ObjectId, SolidObject};
use crate::domain::geometry::Rect;
use crate::domain::tile::{TileGrid, TILE_SIZE};
use super::level::Level;

pub const HERO_ID: ObjectId = ObjectId(0);

/// A pushable crate occupying one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: ObjectId,
    pub hitbox: Rect,
    /// Milliseconds of continuous pushing in the current direction.
    pub push_ms: u32,
}

impl Block {
    pub fn as_object(&self) -> SolidObject {
        SolidObject { id: self.id, hitbox: self.hitbox, solid: true, pushable: true }
    }
}

fn tile_rect(tx: usize, ty: usize) -> Rect {
    Rect::new(
        (tx as i32 * TILE_SIZE) as f32,
        (ty as i32 * TILE_SIZE) as f32,
        TILE_SIZE as f32,
        TILE_SIZE as f32,
    )
}

pub struct World {
    pub level: Level,
    pub tiles: TileGrid,
    pub hero: Actor,
    pub blocks: Vec<Block>,
    pub motion: MotionConfig,
    pub hero_speed: f32,
    pub tick: u64,
    /// The hero ended last frame blocked.
    pub hero_blocked: bool,
}

impl World {
    pub fn from_level(level: Level, config: &Config) -> anyhow::Result<Self> {
        let Some((hx, hy)) = level.hero else {
            bail!("level {:?} has no hero spawn", level.name);
        };
        let mut world = World {
            tiles: level.tiles.clone(),
            hero: Actor::new(HERO_ID, tile_rect(hx, hy)),
            blocks: vec![],
            motion: config.motion.clone(),
            hero_speed: config.sandbox.hero_speed,
            tick: 0,
            hero_blocked: false,
            level,
        };
        world.spawn_blocks();
        Ok(world)
    }

    fn spawn_blocks(&mut self) {
        self.blocks = self
            .level
            .blocks
            .iter()
            .enumerate()
            .map(|(i, &(tx, ty))| Block { id: ObjectId(i as u32 + 1), hitbox: tile_rect(tx, ty), push_ms: 0 })
            .collect();
    }

    /// Put everything back where the level started it.
    pub fn restart(&mut self) {
        let (hx, hy) = self.level.hero.unwrap_or((0, 0));
        self.tiles = self.level.tiles.clone();
        self.hero = Actor::new(HERO_ID, tile_rect(hx, hy));
        self.spawn_blocks();
        self.tick = 0;
        self.hero_blocked = false;
    }

    /// Every solid object as of now, hero included.
    pub fn objects(&self) -> Vec<SolidObject> {
        std::iter::once(self.hero.as_object())
            .chain(self.blocks.iter().map(Block::as_object))
            .collect()
    }

    pub fn hero_properties(&self) -> MovementProperties {
        MovementProperties::walker().excluding(HERO_ID)
    }

    /// Blocks slide rigidly: no wiggle, no chain pushes, no ledge drops.
    pub fn block_properties(&self, id: ObjectId) -> MovementProperties {
        MovementProperties::rigid().excluding(id)
    }
}

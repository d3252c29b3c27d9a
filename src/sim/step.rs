//! The step function: advances the world by one frame.
//!
//! Processing order:
//!   1. Hero: jump playback, or movement resolution from input
//!   2. Blocks, in spawn order: slide when pushed long enough
//!
//! Each mover resolves against a fresh object snapshot, so the order
//! above is also the order in which moves become visible.

use log::{debug, warn};

use crate::domain::action::{self, JumpEvent, PushNotice};
use crate::domain::entity::{Action, Direction};
use crate::domain::physics::MapView;
use crate::domain::resolver::resolve_movement;
use crate::domain::rules;
use super::event::MoveEvent;
use super::world::World;

/// Held directions this frame, each axis in -1..=1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub x: i8,
    pub y: i8,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, input: FrameInput) -> Vec<MoveEvent> {
    let mut events = Vec::new();
    world.tick += 1;
    world.hero.action_ms += world.motion.frame_ms;

    let pushes = resolve_hero(world, input, &mut events);
    resolve_blocks(world, &pushes, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Hero
// ══════════════════════════════════════════════════════════════

fn resolve_hero(world: &mut World, input: FrameInput, events: &mut Vec<MoveEvent>) -> Vec<PushNotice> {
    if world.hero.is_airborne() {
        if action::advance_jump(&mut world.hero) {
            events.push(MoveEvent::Landed { x: world.hero.hitbox.x, y: world.hero.hitbox.y });
        }
        return vec![];
    }

    let props = world.hero_properties();
    let objects = world.objects();
    let map = MapView::new(&world.tiles, &objects);
    let dx = input.x.signum() as f32 * world.hero_speed;
    let dy = input.y.signum() as f32 * world.hero_speed;
    let was_pushing = world.hero.is_pushing();

    let outcome = match resolve_movement(&mut world.hero, dx, dy, &props, &map, &world.motion) {
        Ok(outcome) => outcome,
        Err(e) => {
            events.push(MoveEvent::ResolverFault { reason: e.to_string() });
            return vec![];
        }
    };

    if let Some(direction) = outcome.wiggled {
        events.push(MoveEvent::Wiggled { direction });
    }
    if let Some(amount) = outcome.damage {
        warn!("hero took {amount} damage at ({}, {})", world.hero.hitbox.x, world.hero.hitbox.y);
        events.push(MoveEvent::Damaged { amount });
    }
    let blocked_dir = if outcome.blocked_x.is_some() {
        Some(Direction::horizontal(dx))
    } else if outcome.blocked_y.is_some() {
        Some(Direction::vertical(dy))
    } else {
        None
    };
    if let Some(direction) = blocked_dir.filter(|_| !world.hero_blocked) {
        events.push(MoveEvent::Bumped { direction });
    }
    world.hero_blocked = blocked_dir.is_some();

    match outcome.jump {
        Some(JumpEvent::Started(direction)) => events.push(MoveEvent::JumpStarted { direction }),
        Some(JumpEvent::Aborted) => events.push(MoveEvent::JumpAborted),
        None => {}
    }
    if let Action::Pushing(direction) = world.hero.action {
        if !was_pushing {
            events.push(MoveEvent::PushStarted { direction });
        }
    }
    outcome.pushes
}

// ══════════════════════════════════════════════════════════════
// Blocks
// ══════════════════════════════════════════════════════════════

/// A block slides one pixel per frame once it has been pushed for
/// `push_delay_ms` without a break.
fn resolve_blocks(world: &mut World, pushes: &[PushNotice], events: &mut Vec<MoveEvent>) {
    for i in 0..world.blocks.len() {
        let id = world.blocks[i].id;
        let Some(notice) = pushes.iter().find(|n| n.object == id) else {
            world.blocks[i].push_ms = 0;
            continue;
        };

        world.blocks[i].push_ms += world.motion.frame_ms;
        if world.blocks[i].push_ms < world.motion.push_delay_ms {
            continue;
        }

        let props = world.block_properties(id);
        let objects = world.objects();
        let map = MapView::new(&world.tiles, &objects);
        let hitbox = world.blocks[i].hitbox;
        match rules::can_move(&map, &hitbox, notice.direction, &props) {
            Ok(check) if check.is_open() => {
                let (ux, uy) = notice.direction.delta();
                world.blocks[i].hitbox = hitbox.translated(ux as f32, uy as f32);
                debug!("block {id:?} slid {:?}", notice.direction);
                events.push(MoveEvent::BlockSlid { id, direction: notice.direction });
            }
            Ok(_) => {}
            Err(e) => events.push(MoveEvent::ResolverFault { reason: e.to_string() }),
        }
    }
}

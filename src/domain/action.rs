//! Push and jump-down actions, settled after each resolved move.
//!
//! State machine (one actor):
//!
//! ```text
//!   Idle ──blocked by a pushable, can_push─────► Pushing(dir)
//!   Pushing ──no pushable met / no request─────► Idle
//!   Idle ──blocked only by a ledge drop,
//!          can_jump, charge ≥ jump_charge_ms───► JumpingDown(arc)
//!   JumpingDown ──arc finished─────────────────► Idle (snapped to landing)
//! ```
//!
//! A jump that finds no landing within `jump_min_tiles..=jump_max_tiles`
//! is aborted and the charge restarts.

use log::debug;

use super::entity::{Action, Actor, Direction, MovementProperties, ObjectHit, ObjectId};
use super::geometry::Rect;
use super::physics::{pixel_state, MapView};
use super::ledge::LedgeRelation;
use super::resolver::MoveOutcome;
use super::rules::Blockage;
use super::tile::{tile_of, TILE_SIZE};
use crate::config::MotionConfig;

/// Lateral tolerance for deciding which of several objects a push reaches.
pub const PUSH_ALIGNMENT: f32 = 8.0;

/// Notice to a pushed object: it is being leaned on from `direction`'s
/// opposite side and may react (slide, open, ...).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PushNotice {
    pub object: ObjectId,
    pub direction: Direction,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JumpEvent {
    Started(Direction),
    /// The charge completed but no landing spot was free.
    Aborted,
}

/// A ballistic hop from the ledge lip to a tile-aligned landing spot.
/// Position is interpolated along the ground; `z` is the height above it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct JumpArc {
    pub direction: Direction,
    pub start: (f32, f32),
    pub target: (f32, f32),
    pub frames: u32,
    pub frame: u32,
    pub z: f32,
    pub vz: f32,
    pub gravity: f32,
}

impl JumpArc {
    pub fn new(direction: Direction, from: &Rect, to: &Rect, motion: &MotionConfig) -> Self {
        let distance = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
        let speed = motion.jump_speed.max(f32::EPSILON);
        let frames = ((distance / speed).ceil() as u32).max(1);
        JumpArc {
            direction,
            start: (from.x, from.y),
            target: (to.x, to.y),
            frames,
            frame: 0,
            z: 0.0,
            // Lands back at z = 0 exactly on the last frame.
            vz: motion.jump_gravity * (frames - 1) as f32 / 2.0,
            gravity: motion.jump_gravity,
        }
    }

    /// Ground position after `frame` frames.
    pub fn position_at(&self, frame: u32) -> (f32, f32) {
        let t = frame.min(self.frames) as f32 / self.frames as f32;
        (
            self.start.0 + (self.target.0 - self.start.0) * t,
            self.start.1 + (self.target.1 - self.start.1) * t,
        )
    }
}

// ══════════════════════════════════════════════════════════════
// Settling after a move
// ══════════════════════════════════════════════════════════════

/// Update push/jump state from the outcome of a move request `(dx, dy)`.
pub(crate) fn settle(
    actor: &mut Actor,
    request: (f32, f32),
    outcome: &mut MoveOutcome,
    props: &MovementProperties,
    map: &MapView,
    motion: &MotionConfig,
) {
    let dir = Direction::of_request(request.0, request.1);
    let blockage = match dir {
        Some(d) if d.is_horizontal() => outcome.blocked_x.clone(),
        Some(_) => outcome.blocked_y.clone(),
        None => None,
    };
    let (Some(dir), Some(blockage)) = (dir, blockage) else {
        actor.jump_charge_ms = 0;
        if actor.is_pushing() {
            actor.set_action(Action::Idle);
        }
        return;
    };
    actor.facing = dir;

    if blockage.ledge_drop && props.can_jump {
        if actor.is_pushing() {
            actor.set_action(Action::Idle);
        }
        charge_jump(actor, dir, outcome, props, map, motion);
        return;
    }
    actor.jump_charge_ms = 0;

    if props.can_push && !blockage.pushed.is_empty() {
        actor.set_action(Action::Pushing(dir));
        outcome.pushes = push_notices(&actor.hitbox, dir, &blockage);
    } else if actor.is_pushing() {
        actor.set_action(Action::Idle);
    }
}

fn charge_jump(
    actor: &mut Actor,
    dir: Direction,
    outcome: &mut MoveOutcome,
    props: &MovementProperties,
    map: &MapView,
    motion: &MotionConfig,
) {
    actor.jump_charge_ms += motion.frame_ms;
    if actor.jump_charge_ms < motion.jump_charge_ms {
        return;
    }
    actor.jump_charge_ms = 0;

    let (ax, ay) = actor.hitbox.anchor();
    let jump_dir = map.tiles.behaviors_at_pixel(ax, ay).jump_direction.unwrap_or(dir);
    match find_landing(&actor.hitbox, jump_dir, props, map, motion) {
        Some(landing) => {
            debug!("jump {jump_dir:?} from ({}, {}) to ({}, {})", actor.hitbox.x, actor.hitbox.y, landing.x, landing.y);
            let arc = JumpArc::new(jump_dir, &actor.hitbox, &landing, motion);
            actor.set_action(Action::JumpingDown(arc));
            outcome.jump = Some(JumpEvent::Started(jump_dir));
        }
        None => {
            debug!("jump {jump_dir:?} aborted: no landing");
            outcome.jump = Some(JumpEvent::Aborted);
        }
    }
}

/// Pushes go to the sole pushable object met, or to every object lined
/// up with the actor within `PUSH_ALIGNMENT` on the lateral axis.
fn push_notices(hitbox: &Rect, dir: Direction, blockage: &Blockage) -> Vec<PushNotice> {
    let aligned = |hit: &&ObjectHit| {
        if blockage.pushed.len() == 1 {
            return true;
        }
        if dir.is_horizontal() {
            (hit.hitbox.y - hitbox.y).abs() <= PUSH_ALIGNMENT
        } else {
            (hit.hitbox.x - hitbox.x).abs() <= PUSH_ALIGNMENT
        }
    };
    blockage
        .pushed
        .iter()
        .filter(aligned)
        .map(|hit| PushNotice { object: hit.id, direction: dir })
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Landing search
// ══════════════════════════════════════════════════════════════

/// Hitbox snapped to the tile `tiles` away from the anchor's tile in `dir`.
fn landing_rect(hitbox: &Rect, dir: Direction, tiles: i32) -> Rect {
    let b = hitbox.bounds();
    let (ax, ay) = b.anchor();
    let (atx, aty) = (tile_of(ax), tile_of(ay));
    let (w, h) = (b.width(), b.height());
    let mut landing = *hitbox;
    match dir {
        Direction::Down => landing.y = ((aty + tiles) * TILE_SIZE) as f32,
        Direction::Up => landing.y = ((aty - tiles + 1) * TILE_SIZE - h) as f32,
        Direction::Right => landing.x = ((atx + tiles) * TILE_SIZE) as f32,
        Direction::Left => landing.x = ((atx - tiles + 1) * TILE_SIZE - w) as f32,
    }
    landing
}

/// Every pixel passes the predicate with ledges ignored, and no pixel
/// sits on a tile marked `cannot_land`.
fn landing_clear(map: &MapView, landing: &Rect, props: &MovementProperties) -> bool {
    landing.bounds().pixels().all(|(x, y)| {
        !map.tiles.behaviors_at_pixel(x, y).cannot_land
            && pixel_state(map, x, y, LedgeRelation::Level, props).is_open()
    })
}

pub(crate) fn find_landing(
    hitbox: &Rect,
    dir: Direction,
    props: &MovementProperties,
    map: &MapView,
    motion: &MotionConfig,
) -> Option<Rect> {
    (motion.jump_min_tiles..=motion.jump_max_tiles)
        .map(|k| landing_rect(hitbox, dir, k))
        .find(|landing| landing_clear(map, landing, props))
}

// ══════════════════════════════════════════════════════════════
// Jump playback
// ══════════════════════════════════════════════════════════════

/// Advance an airborne actor by one frame. Returns `true` on the frame
/// it lands. Does nothing for actors on the ground.
pub fn advance_jump(actor: &mut Actor) -> bool {
    let Action::JumpingDown(arc) = &mut actor.action else { return false };
    arc.frame += 1;
    let before = (actor.hitbox.x, actor.hitbox.y);
    if arc.frame >= arc.frames {
        let target = arc.target;
        actor.hitbox.x = target.0;
        actor.hitbox.y = target.1;
        actor.velocity = (target.0 - before.0, target.1 - before.1);
        actor.set_action(Action::Idle);
        return true;
    }
    arc.z += arc.vz;
    arc.vz -= arc.gravity;
    let (x, y) = arc.position_at(arc.frame);
    actor.hitbox.x = x;
    actor.hitbox.y = y;
    actor.velocity = (x - before.0, y - before.1);
    false
}

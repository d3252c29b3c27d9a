//! Movement resolver: turns a requested per-frame displacement into
//! the largest collision-free displacement the actor can achieve.
//!
//! The request is consumed in steps of at most one pixel, X before Y on
//! every iteration. A step that leaves the floored pixel bounds
//! unchanged needs no scan; any other step asks the directional rules.
//!
//! ```text
//!   step outcome   effect
//!   ──────────────────────────────────────────────────────────
//!   open           move, consume the step
//!   wiggle         slide one pixel laterally, consume the step
//!   blocked        keep the remainder, record the blockage
//!   hazard         apply damage, stop resolving at once
//! ```
//!
//! Resolution stops when both axes are consumed or an iteration makes
//! no progress. Diagonal requests never push or wiggle.

use log::warn;

use super::action::{self, JumpEvent, PushNotice};
use super::entity::{Action, Actor, Direction, MovementProperties};
use super::error::MoveError;
use super::physics::MapView;
use super::rules::{check_step, validate_hitbox, Blockage, ScanMode, StepCheck};
use crate::config::MotionConfig;

/// Hard cap on resolver iterations per call.
pub const MAX_RESOLVER_ITERATIONS: usize = 100;

/// Result of one `resolve_movement` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveOutcome {
    /// Displacement actually applied, wiggle slides included.
    pub dx: f32,
    pub dy: f32,
    /// Set when the horizontal axis ended the call blocked.
    pub blocked_x: Option<Blockage>,
    pub blocked_y: Option<Blockage>,
    pub wiggled: Option<Direction>,
    pub damage: Option<u32>,
    pub pushes: Vec<PushNotice>,
    pub jump: Option<JumpEvent>,
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        self.blocked_x.is_some() || self.blocked_y.is_some()
    }

    fn blocked_mut(&mut self, dir: Direction) -> &mut Option<Blockage> {
        if dir.is_horizontal() {
            &mut self.blocked_x
        } else {
            &mut self.blocked_y
        }
    }

    fn record(&mut self, dir: Direction, amount: f32) {
        let (ux, uy) = dir.delta();
        self.dx += ux as f32 * amount;
        self.dy += uy as f32 * amount;
    }
}

enum AxisStep {
    Moved,
    Wiggled(Direction),
    Blocked(Blockage),
    Hurt(u32),
}

/// Move `actor` by up to `(dx, dy)` pixels this frame.
///
/// The actor's hitbox, velocity, facing, action and damage are updated
/// in place. An airborne actor is left alone: its jump arc owns the
/// position until it lands.
pub fn resolve_movement(
    actor: &mut Actor,
    dx: f32,
    dy: f32,
    props: &MovementProperties,
    map: &MapView,
    motion: &MotionConfig,
) -> Result<MoveOutcome, MoveError> {
    validate_hitbox(&actor.hitbox)?;
    if !dx.is_finite() || !dy.is_finite() {
        warn!("rejecting displacement ({dx}, {dy})");
        return Err(MoveError::InvalidDisplacement { dx, dy });
    }
    if actor.is_airborne() {
        return Ok(MoveOutcome::default());
    }

    let mode = if dx != 0.0 && dy != 0.0 { ScanMode::PLAIN } else { ScanMode::from_props(props) };
    let x_dir = Direction::horizontal(dx);
    let y_dir = Direction::vertical(dy);
    let mut remaining_x = dx.abs();
    let mut remaining_y = dy.abs();
    let mut outcome = MoveOutcome::default();
    let mut finished = false;

    for _ in 0..MAX_RESOLVER_ITERATIONS {
        let mut progressed = false;
        let mut hurt = false;

        for (dir, remaining) in [(x_dir, &mut remaining_x), (y_dir, &mut remaining_y)] {
            if *remaining <= 0.0 {
                continue;
            }
            let amount = remaining.min(1.0);
            match step_axis(actor, dir, amount, props, mode, map)? {
                AxisStep::Moved => {
                    *remaining -= amount;
                    outcome.record(dir, amount);
                    *outcome.blocked_mut(dir) = None;
                    progressed = true;
                }
                AxisStep::Wiggled(side) => {
                    *remaining -= amount;
                    outcome.record(side, 1.0);
                    outcome.wiggled = Some(side);
                    progressed = true;
                }
                AxisStep::Blocked(blockage) => {
                    *outcome.blocked_mut(dir) = Some(blockage);
                }
                AxisStep::Hurt(damage) => {
                    actor.damage_taken = actor.damage_taken.saturating_add(damage);
                    outcome.damage = Some(damage);
                    hurt = true;
                    break;
                }
            }
        }

        if hurt || !progressed || (remaining_x <= 0.0 && remaining_y <= 0.0) {
            finished = true;
            break;
        }
    }

    actor.velocity = (outcome.dx, outcome.dy);
    if !finished {
        warn!(
            "resolver for {:?} capped at {MAX_RESOLVER_ITERATIONS} iterations, request ({dx}, {dy}), achieved ({}, {})",
            actor.id, outcome.dx, outcome.dy
        );
        // No action survives a faulted frame.
        actor.jump_charge_ms = 0;
        if actor.is_pushing() {
            actor.set_action(Action::Idle);
        }
        return Err(MoveError::IterationCap {
            iterations: MAX_RESOLVER_ITERATIONS,
            achieved: (outcome.dx, outcome.dy),
        });
    }

    action::settle(actor, (dx, dy), &mut outcome, props, map, motion);
    Ok(outcome)
}

fn step_axis(
    actor: &mut Actor,
    dir: Direction,
    amount: f32,
    props: &MovementProperties,
    mode: ScanMode,
    map: &MapView,
) -> Result<AxisStep, MoveError> {
    let (ux, uy) = dir.delta();
    let moved = actor.hitbox.translated(ux as f32 * amount, uy as f32 * amount);
    let before = actor.hitbox.bounds();
    if moved.bounds() == before {
        actor.hitbox = moved;
        return Ok(AxisStep::Moved);
    }

    match check_step(map, before, dir, props, mode)? {
        StepCheck::Open => {
            actor.hitbox = moved;
            Ok(AxisStep::Moved)
        }
        StepCheck::Blocked(blockage) => {
            if let Some(damage) = blockage.hazard {
                return Ok(AxisStep::Hurt(damage));
            }
            if let Some(side) = blockage.wiggle {
                let (sx, sy) = side.delta();
                actor.hitbox = actor.hitbox.translated(sx as f32, sy as f32);
                return Ok(AxisStep::Wiggled(side));
            }
            Ok(AxisStep::Blocked(blockage))
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

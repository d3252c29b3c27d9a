//! Directional step rules: may a hitbox advance one pixel in a
//! direction, and if not, what is in the way?
//!
//! Each scan walks the leading edge (the strip of pixels just outside
//! the hitbox) with two cursors that start at the anchor's lateral
//! coordinate and move outward, alternating:
//!
//! ```text
//!          min side ◄──── anchor ────► max side
//!   edge:  .  .  .  3  1  |  0  2  4  .  .  .
//! ```
//!
//! Which side hit an obstruction drives wiggle correction:
//!
//! ```text
//!   min blocked   max blocked   hint
//!   ─────────────────────────────────────────────
//!       no            no        (step is open)
//!       yes           no        toward max side
//!       no            yes       toward min side
//!       yes           yes       none
//! ```
//!
//! A hint becomes a wiggle only if the box can slide up to
//! `WIGGLE_RANGE` pixels that way and then step forward, all without
//! further correction.

use log::{trace, warn};

use super::entity::{Direction, MovementProperties, ObjectHit};
use super::error::MoveError;
use super::geometry::{PixelBounds, Rect};
use super::ledge;
use super::physics::{pixel_state, BlockReason, MapView, PixelState};

/// Furthest lateral slide a wiggle may take.
pub const WIGGLE_RANGE: i32 = 8;

/// What stopped a one-pixel step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Blockage {
    /// Lateral direction that clears the obstruction, if one exists.
    pub wiggle: Option<Direction>,
    /// Pushable objects met on the edge, nearest the anchor first.
    pub pushed: Vec<ObjectHit>,
    /// Largest hazard damage touched.
    pub hazard: Option<u32>,
    /// Every blocked pixel was a ledge drop.
    pub ledge_drop: bool,
    /// Something solid (wall, hazard, object) was touched.
    pub solid_contact: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StepCheck {
    Open,
    Blocked(Blockage),
}

impl StepCheck {
    pub fn is_open(&self) -> bool {
        matches!(self, StepCheck::Open)
    }

    pub fn blockage(&self) -> Option<&Blockage> {
        match self {
            StepCheck::Open => None,
            StepCheck::Blocked(b) => Some(b),
        }
    }
}

/// Per-call switches on top of the actor's capabilities. Diagonal
/// requests and wiggle searches turn both off.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct ScanMode {
    pub wiggle: bool,
    pub push: bool,
}

impl ScanMode {
    pub const PLAIN: ScanMode = ScanMode { wiggle: false, push: false };

    pub fn from_props(props: &MovementProperties) -> Self {
        ScanMode { wiggle: props.can_wiggle, push: props.can_push }
    }
}

// ══════════════════════════════════════════════════════════════
// Public step checks
// ══════════════════════════════════════════════════════════════

pub fn can_move_up(map: &MapView, hitbox: &Rect, props: &MovementProperties) -> Result<StepCheck, MoveError> {
    can_move(map, hitbox, Direction::Up, props)
}

pub fn can_move_down(map: &MapView, hitbox: &Rect, props: &MovementProperties) -> Result<StepCheck, MoveError> {
    can_move(map, hitbox, Direction::Down, props)
}

pub fn can_move_left(map: &MapView, hitbox: &Rect, props: &MovementProperties) -> Result<StepCheck, MoveError> {
    can_move(map, hitbox, Direction::Left, props)
}

pub fn can_move_right(map: &MapView, hitbox: &Rect, props: &MovementProperties) -> Result<StepCheck, MoveError> {
    can_move(map, hitbox, Direction::Right, props)
}

/// Check a one-pixel step in `dir` without moving anything.
pub fn can_move(
    map: &MapView,
    hitbox: &Rect,
    dir: Direction,
    props: &MovementProperties,
) -> Result<StepCheck, MoveError> {
    validate_hitbox(hitbox)?;
    check_step(map, hitbox.bounds(), dir, props, ScanMode::from_props(props))
}

pub(crate) fn validate_hitbox(hitbox: &Rect) -> Result<(), MoveError> {
    if hitbox.is_valid() {
        return Ok(());
    }
    warn!("rejecting hitbox {hitbox:?}");
    Err(MoveError::InvalidHitbox { w: hitbox.w, h: hitbox.h })
}

pub(crate) fn check_step(
    map: &MapView,
    bounds: PixelBounds,
    dir: Direction,
    props: &MovementProperties,
    mode: ScanMode,
) -> Result<StepCheck, MoveError> {
    let scan = scan_edge(map, bounds, dir, props, mode)?;
    if !scan.blocked_min && !scan.blocked_max {
        return Ok(StepCheck::Open);
    }

    let mut blockage = Blockage {
        wiggle: None,
        ledge_drop: scan.saw_drop && !scan.saw_other,
        solid_contact: scan.solid_contact,
        hazard: scan.hazard,
        pushed: scan.pushed,
    };
    if mode.wiggle && blockage.hazard.is_none() {
        let (toward_min, toward_max) = dir.laterals();
        let hint = match (scan.blocked_min, scan.blocked_max) {
            (true, false) => Some(toward_max),
            (false, true) => Some(toward_min),
            _ => None,
        };
        if let Some(side) = hint {
            blockage.wiggle = find_wiggle(map, bounds, dir, side, props)?;
        }
    }
    trace!("{dir:?} step from {bounds:?} blocked: {blockage:?}");
    Ok(StepCheck::Blocked(blockage))
}

// ══════════════════════════════════════════════════════════════
// Edge scan
// ══════════════════════════════════════════════════════════════

#[derive(Default)]
struct EdgeScan {
    blocked_min: bool,
    blocked_max: bool,
    pushed: Vec<ObjectHit>,
    hazard: Option<u32>,
    saw_drop: bool,
    saw_other: bool,
    solid_contact: bool,
}

impl EdgeScan {
    fn visit(&mut self, state: PixelState, max_side: bool, mode: ScanMode) {
        match state {
            PixelState::Open => return,
            PixelState::Blocked(reason) => {
                match reason {
                    BlockReason::Hazard(d) => self.hazard = Some(self.hazard.map_or(d, |h| h.max(d))),
                    BlockReason::LedgeDrop => self.saw_drop = true,
                    _ => {}
                }
                if reason != BlockReason::LedgeDrop {
                    self.saw_other = true;
                }
                self.solid_contact |= reason.is_solid_contact();
            }
            PixelState::Occupied(hit) => {
                self.saw_other = true;
                self.solid_contact = true;
                if mode.push && hit.pushable && !self.pushed.iter().any(|h| h.id == hit.id) {
                    self.pushed.push(hit);
                }
            }
        }
        if max_side {
            self.blocked_max = true;
        } else {
            self.blocked_min = true;
        }
    }
}

fn scan_edge(
    map: &MapView,
    bounds: PixelBounds,
    dir: Direction,
    props: &MovementProperties,
    mode: ScanMode,
) -> Result<EdgeScan, MoveError> {
    let edge = bounds.leading_edge(dir);
    let anchor = bounds.anchor();
    let mid = if dir.is_horizontal() { anchor.1 } else { anchor.0 };

    let mut min_cursor = mid - 1;
    let mut max_cursor = mid;
    let budget = edge.span() as usize + 1;
    let mut scan = EdgeScan::default();

    for _ in 0..budget {
        let min_live = min_cursor >= edge.lo;
        let max_live = max_cursor <= edge.hi;
        if !min_live && !max_live {
            return Ok(scan);
        }
        if min_live {
            let (x, y) = edge.pixel(min_cursor);
            let relation = ledge::classify(map.tiles, anchor, (x, y));
            scan.visit(pixel_state(map, x, y, relation, props), false, mode);
            min_cursor -= 1;
        }
        if max_live {
            let (x, y) = edge.pixel(max_cursor);
            let relation = ledge::classify(map.tiles, anchor, (x, y));
            scan.visit(pixel_state(map, x, y, relation, props), true, mode);
            max_cursor += 1;
        }
    }

    warn!("{dir:?} edge scan of {bounds:?} ran out of budget ({budget})");
    Err(MoveError::ScanExhausted { direction: dir, iterations: budget })
}

// ══════════════════════════════════════════════════════════════
// Wiggle correction
// ══════════════════════════════════════════════════════════════

/// Slide up to `WIGGLE_RANGE` pixels toward `side`, one pixel at a time.
/// Each slide pixel must be free, and the box must be able to step in
/// `dir` from some slid position.
fn find_wiggle(
    map: &MapView,
    bounds: PixelBounds,
    dir: Direction,
    side: Direction,
    props: &MovementProperties,
) -> Result<Option<Direction>, MoveError> {
    let (sx, sy) = side.delta();
    let mut shifted = bounds;
    for _ in 0..WIGGLE_RANGE {
        if !check_step(map, shifted, side, props, ScanMode::PLAIN)?.is_open() {
            return Ok(None);
        }
        shifted = shifted.shifted(sx, sy);
        if check_step(map, shifted, dir, props, ScanMode::PLAIN)?.is_open() {
            return Ok(Some(side));
        }
    }
    Ok(None)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{NoObjects, ObjectId, SolidObject};
    use crate::domain::grid_from;
    use crate::domain::tile::{TileBehaviors, TileGrid};

    fn tile_box(tx: i32, ty: i32) -> Rect {
        Rect::new((tx * 16) as f32, (ty * 16) as f32, 16.0, 16.0)
    }

    fn walker() -> MovementProperties {
        MovementProperties::walker()
    }

    #[test]
    fn open_field_all_directions() {
        let grid = grid_from(&["...", "...", "..."]);
        let map = MapView::new(&grid, &NoObjects);
        let b = tile_box(1, 1);
        assert!(can_move_up(&map, &b, &walker()).unwrap().is_open());
        assert!(can_move_down(&map, &b, &walker()).unwrap().is_open());
        assert!(can_move_left(&map, &b, &walker()).unwrap().is_open());
        assert!(can_move_right(&map, &b, &walker()).unwrap().is_open());
    }

    #[test]
    fn solid_row_blocks_without_wiggle() {
        let grid = grid_from(&["...", "...", "###"]);
        let map = MapView::new(&grid, &NoObjects);
        let check = can_move_down(&map, &tile_box(1, 1), &walker()).unwrap();
        let b = check.blockage().unwrap();
        assert_eq!(b.wiggle, None);
        assert!(b.solid_contact);
        assert!(!b.ledge_drop);
    }

    #[test]
    fn aligned_gap_is_open() {
        let grid = grid_from(&["...", "#.#"]);
        let map = MapView::new(&grid, &NoObjects);
        assert!(can_move_down(&map, &tile_box(1, 0), &walker()).unwrap().is_open());
    }

    #[test]
    fn corner_within_range_wiggles() {
        // Box 8px right of the gap at tile column 1: the right half hits the wall.
        let grid = grid_from(&["....", "#.##"]);
        let map = MapView::new(&grid, &NoObjects);
        let b = Rect::new(24.0, 0.0, 16.0, 16.0);
        let check = can_move_down(&map, &b, &walker()).unwrap();
        assert_eq!(check.blockage().unwrap().wiggle, Some(Direction::Left));
    }

    #[test]
    fn corner_nine_pixels_off_does_not_wiggle() {
        let grid = grid_from(&["....", "#.##"]);
        let map = MapView::new(&grid, &NoObjects);
        let b = Rect::new(25.0, 0.0, 16.0, 16.0);
        let check = can_move_down(&map, &b, &walker()).unwrap();
        assert_eq!(check.blockage().unwrap().wiggle, None);
    }

    #[test]
    fn wiggle_range_matches_in_every_direction() {
        // One gap fixture turned four ways. The box starts 8 px past the
        // gap, then 9 px; the hint points back toward the gap.
        let cases: [(Direction, &[&str], (f32, f32), (f32, f32), Direction); 4] = [
            (Direction::Down, &["....", "#.##"][..], (24.0, 0.0), (1.0, 0.0), Direction::Left),
            (Direction::Up, &["#.##", "...."][..], (24.0, 16.0), (1.0, 0.0), Direction::Left),
            (Direction::Right, &[".#", "..", ".#", ".#"][..], (0.0, 24.0), (0.0, 1.0), Direction::Up),
            (Direction::Left, &["#.", "..", "#.", "#."][..], (16.0, 24.0), (0.0, 1.0), Direction::Up),
        ];
        for (dir, rows, (x, y), (nx, ny), hint) in cases {
            let grid = grid_from(rows);
            let map = MapView::new(&grid, &NoObjects);
            let near = Rect::new(x, y, 16.0, 16.0);
            let check = can_move(&map, &near, dir, &walker()).unwrap();
            assert_eq!(check.blockage().unwrap().wiggle, Some(hint), "{dir:?} at 8 px");

            let far = near.translated(nx, ny);
            let check = can_move(&map, &far, dir, &walker()).unwrap();
            assert_eq!(check.blockage().unwrap().wiggle, None, "{dir:?} at 9 px");
        }
    }

    #[test]
    fn wiggle_needs_the_capability() {
        let grid = grid_from(&["....", "#.##"]);
        let map = MapView::new(&grid, &NoObjects);
        let b = Rect::new(20.0, 0.0, 16.0, 16.0);
        let check = can_move_down(&map, &b, &MovementProperties::rigid()).unwrap();
        assert_eq!(check.blockage().unwrap().wiggle, None);
    }

    #[test]
    fn wiggle_blocked_laterally_fails() {
        let grid = grid_from(&["....", "#.##"]);
        let map = MapView::new(&grid, &NoObjects);
        let b = Rect::new(20.0, 0.0, 16.0, 16.0);
        let check = can_move_down(&map, &b, &walker()).unwrap();
        assert_eq!(check.blockage().unwrap().wiggle, Some(Direction::Left));

        // A block right beside the box stops the slide.
        let objects = vec![
            SolidObject { id: ObjectId(3), hitbox: Rect::new(4.0, 0.0, 16.0, 16.0), solid: true, pushable: false },
        ];
        let map = MapView::new(&grid, &objects);
        let check = can_move_down(&map, &b, &walker()).unwrap();
        assert_eq!(check.blockage().unwrap().wiggle, None);
    }

    #[test]
    fn ledge_drop_flagged() {
        let grid = grid_from(&["v", "."]);
        let map = MapView::new(&grid, &NoObjects);
        let check = can_move_down(&map, &tile_box(0, 0), &walker()).unwrap();
        let b = check.blockage().unwrap();
        assert!(b.ledge_drop);
        assert!(!b.solid_contact);
        // Crossing capability opens it.
        let mut p = walker();
        p.can_cross_ledges = true;
        assert!(can_move_down(&map, &tile_box(0, 0), &p).unwrap().is_open());
    }

    #[test]
    fn corner_lip_blocks_the_step_into_it() {
        let mut grid = TileGrid::new(4, 4);
        // Anchor in tile (1, 1); the right end of the bottom edge reaches tile (2, 2).
        let b = Rect::new(23.0, 16.0, 16.0, 16.0);
        let map = MapView::new(&grid, &NoObjects);
        assert!(can_move_down(&map, &b, &MovementProperties::rigid()).unwrap().is_open());

        grid.set(2, 2, TileBehaviors::ledge(Direction::Left, true));
        let map = MapView::new(&grid, &NoObjects);
        let check = can_move_down(&map, &b, &MovementProperties::rigid()).unwrap();
        let blockage = check.blockage().unwrap();
        assert!(blockage.ledge_drop);
        assert!(!blockage.solid_contact);
    }

    #[test]
    fn hazard_blocks_and_reports_damage() {
        let grid = grid_from(&[".", "X"]);
        let map = MapView::new(&grid, &NoObjects);
        let check = can_move_down(&map, &tile_box(0, 0), &walker()).unwrap();
        assert_eq!(check.blockage().unwrap().hazard, Some(1));
    }

    #[test]
    fn pushable_objects_collected_once() {
        let grid = TileGrid::new(4, 4);
        let objects = vec![
            SolidObject { id: ObjectId(1), hitbox: Rect::new(16.0, 32.0, 16.0, 16.0), solid: true, pushable: true },
            SolidObject { id: ObjectId(2), hitbox: Rect::new(32.0, 32.0, 16.0, 16.0), solid: true, pushable: false },
        ];
        let map = MapView::new(&grid, &objects);
        let check = can_move_down(&map, &Rect::new(24.0, 16.0, 16.0, 16.0), &walker()).unwrap();
        let b = check.blockage().unwrap();
        assert_eq!(b.pushed.len(), 1);
        assert_eq!(b.pushed[0].id, ObjectId(1));
        assert!(b.solid_contact);
    }

    #[test]
    fn one_pixel_hitbox_scans() {
        let grid = grid_from(&["..", ".#"]);
        let map = MapView::new(&grid, &NoObjects);
        let dot = Rect::new(20.0, 15.0, 1.0, 1.0);
        assert!(!can_move_down(&map, &dot, &MovementProperties::rigid()).unwrap().is_open());
        assert!(can_move_left(&map, &dot, &MovementProperties::rigid()).unwrap().is_open());
    }

    #[test]
    fn invalid_hitbox_rejected() {
        let grid = TileGrid::new(2, 2);
        let map = MapView::new(&grid, &NoObjects);
        let err = can_move_up(&map, &Rect::new(0.0, 0.0, 0.0, 0.0), &walker()).unwrap_err();
        assert!(matches!(err, MoveError::InvalidHitbox { .. }));
    }
}

//! Blocked-pixel predicate: the single answer to "can an actor's edge
//! occupy this pixel?".
//!
//! ## Layers
//!
//!   1. TERRAIN   what the tile under the pixel IS (behaviors, ledges)
//!   2. OCCUPANCY which solid object covers the pixel
//!
//! Terrain is checked first. An object is only reported when the
//! terrain itself lets the actor through, so a pushable block sitting
//! in a wall never turns a wall contact into a push.
//!
//! ## Rule order
//!
//! ```text
//!   outside padded section            → Blocked(OutOfSection)
//!   solid && damage > 0               → Blocked(Hazard)
//!   solid && !climbable               → Blocked(Solid)
//!   pit       && !can_fall            → Blocked(Pit)
//!   water     && !can_swim            → Blocked(Water)
//!   climbable && !can_climb           → Blocked(Climbable)
//!   relation Walled                   → Blocked(Walled)
//!   relation Under && !can_cross      → Blocked(LedgeRise)
//!   relation Above && !can_cross      → Blocked(LedgeDrop)
//!   solid object, not excluded        → Occupied
//!   otherwise                         → Open
//! ```

use super::entity::{MovementProperties, ObjectHit, ObjectQuery};
use super::ledge::LedgeRelation;
use super::tile::TileGrid;

/// Everything a movement query reads: tiles and the other objects.
#[derive(Clone, Copy)]
pub struct MapView<'a> {
    pub tiles: &'a TileGrid,
    pub objects: &'a dyn ObjectQuery,
}

impl<'a> MapView<'a> {
    pub fn new(tiles: &'a TileGrid, objects: &'a dyn ObjectQuery) -> Self {
        MapView { tiles, objects }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockReason {
    OutOfSection,
    Hazard(u32),
    Solid,
    Pit,
    Water,
    Climbable,
    Walled,
    LedgeRise,
    LedgeDrop,
}

impl BlockReason {
    /// Contact with something an actor can lean against.
    pub fn is_solid_contact(self) -> bool {
        matches!(self, BlockReason::Solid | BlockReason::Hazard(_))
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PixelState {
    Open,
    Blocked(BlockReason),
    Occupied(ObjectHit),
}

impl PixelState {
    pub fn is_open(&self) -> bool {
        matches!(self, PixelState::Open)
    }
}

/// Evaluate pixel `(x, y)` for an actor whose anchor stands in
/// `relation` to it.
pub fn pixel_state(
    map: &MapView,
    x: i32,
    y: i32,
    relation: LedgeRelation,
    props: &MovementProperties,
) -> PixelState {
    if props.outside_section(x, y) {
        return PixelState::Blocked(BlockReason::OutOfSection);
    }

    // ── Terrain ──
    let tile = map.tiles.behaviors_at_pixel(x, y);
    if tile.is_hazard() {
        return PixelState::Blocked(BlockReason::Hazard(tile.damage));
    }
    if tile.solid && !tile.climbable {
        return PixelState::Blocked(BlockReason::Solid);
    }
    if tile.pit && !props.can_fall {
        return PixelState::Blocked(BlockReason::Pit);
    }
    if tile.water && !props.can_swim {
        return PixelState::Blocked(BlockReason::Water);
    }
    if tile.climbable && !props.can_climb {
        return PixelState::Blocked(BlockReason::Climbable);
    }
    match relation {
        LedgeRelation::Walled => return PixelState::Blocked(BlockReason::Walled),
        LedgeRelation::Under if !props.can_cross_ledges => {
            return PixelState::Blocked(BlockReason::LedgeRise)
        }
        LedgeRelation::Above if !props.can_cross_ledges => {
            return PixelState::Blocked(BlockReason::LedgeDrop)
        }
        _ => {}
    }

    // ── Occupancy ──
    match map.objects.solid_object_at(x, y, &props.excluded_objects) {
        Some(hit) => PixelState::Occupied(hit),
        None => PixelState::Open,
    }
}

/// Is pixel `(x, y)` open, ignoring ledges?
pub fn is_pixel_open(map: &MapView, x: i32, y: i32, props: &MovementProperties) -> bool {
    pixel_state(map, x, y, LedgeRelation::Level, props).is_open()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

//! Ledge classification: is a pixel below, above, or level with an
//! actor's anchor?
//!
//! One-way ledges are height differences between neighbouring tiles.
//! A pixel is `Above` the anchor when reaching it means dropping off a
//! ledge (anchor high, pixel low), and `Under` when reaching it means
//! climbing one. The cascade checks, in order:
//!
//! ```text
//! 0. hard edges between the two tiles      → Walled
//! 1. axis-adjacent tiles, ledge flags      → Above
//! 2. corner neighbours, both routes agree  → Above
//! 3. diagonal ledge line, exact integers   → Above
//! 4. steps 1-3 with the roles reversed     → Under
//! 5. corner lip: the pixel's tile flags a
//!    side facing the anchor's row/column   → Above
//! 6. otherwise                             → Level
//! ```
//!
//! Classification does not depend on which way the actor is moving.

use super::entity::Direction;
use super::tile::{tile_of, TileGrid};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LedgeRelation {
    Level,
    /// Pixel is on the low side: reaching it is a drop.
    Above,
    /// Pixel is on the high side: reaching it is a climb.
    Under,
    /// A hard edge separates the pixel from the anchor.
    Walled,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Slope {
    Drop,
    Rise,
}

/// Classify `pixel` relative to an actor whose anchor is `anchor`.
pub fn classify(tiles: &TileGrid, anchor: (i32, i32), pixel: (i32, i32)) -> LedgeRelation {
    let from = (tile_of(anchor.0), tile_of(anchor.1));
    let to = (tile_of(pixel.0), tile_of(pixel.1));

    if walled(tiles, from, to) {
        return LedgeRelation::Walled;
    }
    for (slope, relation) in [(Slope::Drop, LedgeRelation::Above), (Slope::Rise, LedgeRelation::Under)] {
        if axis_crossing(tiles, from, to, slope)
            || corner_crossing(tiles, from, to, slope)
            || diagonal_crossing(tiles, anchor, pixel, slope)
        {
            return relation;
        }
    }
    if corner_lip(tiles, from, to) {
        return LedgeRelation::Above;
    }
    LedgeRelation::Level
}

// ── Tile-to-tile steps ──

fn neighbour(tile: (i32, i32), dir: Direction) -> (i32, i32) {
    let (dx, dy) = dir.delta();
    (tile.0 + dx, tile.1 + dy)
}

/// Crossing from `tile` through its `dir` side.
///
/// ```text
///              near.ledge(dir)   far.ledge(opposite)
///   Drop         Some(true)    or    Some(false)
///   Rise         Some(false)   or    Some(true)
/// ```
fn step_slopes(tiles: &TileGrid, tile: (i32, i32), dir: Direction, slope: Slope) -> bool {
    let far = neighbour(tile, dir);
    let near = tiles.behaviors_at(tile.0, tile.1).ledge_flag(dir);
    let far = tiles.behaviors_at(far.0, far.1).ledge_flag(dir.opposite());
    match slope {
        Slope::Drop => near == Some(true) || far == Some(false),
        Slope::Rise => far == Some(true) || near == Some(false),
    }
}

fn step_walled(tiles: &TileGrid, tile: (i32, i32), dir: Direction) -> bool {
    let far = neighbour(tile, dir);
    tiles.behaviors_at(tile.0, tile.1).edge_flag(dir)
        || tiles.behaviors_at(far.0, far.1).edge_flag(dir.opposite())
}

/// Single axis step between the two tiles, if they are axis-adjacent.
fn axis_step(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
    match (to.0 - from.0, to.1 - from.1) {
        (1, 0) => Some(Direction::Right),
        (-1, 0) => Some(Direction::Left),
        (0, 1) => Some(Direction::Down),
        (0, -1) => Some(Direction::Up),
        _ => None,
    }
}

/// Horizontal and vertical legs, if the two tiles are corner neighbours.
fn corner_legs(from: (i32, i32), to: (i32, i32)) -> Option<(Direction, Direction)> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    if dx.abs() != 1 || dy.abs() != 1 {
        return None;
    }
    Some((Direction::horizontal(dx as f32), Direction::vertical(dy as f32)))
}

/// Both L-shaped routes to a corner neighbour must cross the boundary.
fn corner_routes(
    from: (i32, i32),
    to: (i32, i32),
    mut crosses: impl FnMut((i32, i32), Direction) -> bool,
) -> bool {
    let Some((h, v)) = corner_legs(from, to) else { return false };
    let via_h = crosses(from, h) || crosses(neighbour(from, h), v);
    let via_v = crosses(from, v) || crosses(neighbour(from, v), h);
    via_h && via_v
}

fn walled(tiles: &TileGrid, from: (i32, i32), to: (i32, i32)) -> bool {
    if let Some(dir) = axis_step(from, to) {
        return step_walled(tiles, from, dir);
    }
    corner_routes(from, to, |tile, dir| step_walled(tiles, tile, dir))
}

fn axis_crossing(tiles: &TileGrid, from: (i32, i32), to: (i32, i32), slope: Slope) -> bool {
    axis_step(from, to).is_some_and(|dir| step_slopes(tiles, from, dir, slope))
}

fn corner_crossing(tiles: &TileGrid, from: (i32, i32), to: (i32, i32), slope: Slope) -> bool {
    corner_routes(from, to, |tile, dir| step_slopes(tiles, tile, dir, slope))
}

/// A corner neighbour carrying a jump-out flag on a side that faces the
/// anchor's row or column is entered by dropping into it. Leaving it
/// again falls back to the route rules.
fn corner_lip(tiles: &TileGrid, from: (i32, i32), to: (i32, i32)) -> bool {
    let Some((h, v)) = corner_legs(from, to) else { return false };
    let t = tiles.behaviors_at(to.0, to.1);
    [h.opposite(), v.opposite()].into_iter().any(|side| t.ledge_flag(side) == Some(true))
}

// ── Diagonal ledges ──

/// The pixel's own tile decides when it carries a diagonal ledge,
/// otherwise the anchor's tile does.
fn diagonal_crossing(tiles: &TileGrid, anchor: (i32, i32), pixel: (i32, i32), slope: Slope) -> bool {
    let owner = [pixel, anchor].into_iter().find_map(|(x, y)| {
        let (tx, ty) = (tile_of(x), tile_of(y));
        tiles.behaviors_at(tx, ty).diagonal_ledge.map(|d| (d, tx, ty))
    });
    let Some((ledge, tx, ty)) = owner else { return false };

    let anchor_low = ledge.is_low_side(tx, ty, anchor.0, anchor.1);
    let pixel_low = ledge.is_low_side(tx, ty, pixel.0, pixel.1);
    match slope {
        Slope::Drop => !anchor_low && pixel_low,
        Slope::Rise => anchor_low && !pixel_low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid_from;
    use crate::domain::tile::{DiagonalLedge, TileBehaviors};

    #[test]
    fn open_ground_is_level() {
        let grid = grid_from(&["...", "...", "..."]);
        assert_eq!(classify(&grid, (24, 24), (40, 24)), LedgeRelation::Level);
        assert_eq!(classify(&grid, (24, 24), (24, 24)), LedgeRelation::Level);
    }

    #[test]
    fn down_ledge_drop_and_climb() {
        let grid = grid_from(&["...", ".v.", "..."]);
        // Anchor on the ledge tile, pixel below it: a drop.
        assert_eq!(classify(&grid, (24, 24), (24, 32)), LedgeRelation::Above);
        // From below back up: a climb.
        assert_eq!(classify(&grid, (24, 40), (24, 31)), LedgeRelation::Under);
        // Sideways off the ledge tile is level.
        assert_eq!(classify(&grid, (24, 24), (32, 24)), LedgeRelation::Level);
    }

    #[test]
    fn low_side_flag_on_far_tile() {
        let mut grid = TileGrid::new(3, 3);
        // Entry into (1, 2) from above requires a jump.
        grid.set(1, 2, TileBehaviors::ledge(Direction::Up, false));
        assert_eq!(classify(&grid, (24, 24), (24, 32)), LedgeRelation::Above);
        assert_eq!(classify(&grid, (24, 40), (24, 31)), LedgeRelation::Under);
    }

    #[test]
    fn convex_corner_drop() {
        let mut grid = TileGrid::new(3, 3);
        let mut lip = TileBehaviors::ledge(Direction::Down, true);
        lip.ledges.right = Some(true);
        grid.set(0, 0, lip);
        // Lower-right corner neighbour is reached over both ledges.
        assert_eq!(classify(&grid, (8, 8), (16, 16)), LedgeRelation::Above);
        assert_eq!(classify(&grid, (20, 20), (15, 15)), LedgeRelation::Under);
    }

    #[test]
    fn corner_needs_both_routes() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(0, 0, TileBehaviors::ledge(Direction::Down, true));
        // The route via (1, 0) never crosses a ledge.
        assert_eq!(classify(&grid, (8, 8), (16, 16)), LedgeRelation::Level);
    }

    #[test]
    fn corner_lip_is_a_drop() {
        // Anchor upper-left, lower-right neighbour flagged `left: true`.
        let mut grid = TileGrid::new(4, 4);
        grid.set(2, 2, TileBehaviors::ledge(Direction::Left, true));
        assert_eq!(classify(&grid, (24, 24), (32, 32)), LedgeRelation::Above);
        // Leaving the lip tile crosses only one route.
        assert_eq!(classify(&grid, (40, 40), (31, 31)), LedgeRelation::Level);
        // The axis neighbours of the anchor are unaffected.
        assert_eq!(classify(&grid, (24, 24), (24, 32)), LedgeRelation::Level);
        assert_eq!(classify(&grid, (24, 24), (32, 24)), LedgeRelation::Level);
    }

    #[test]
    fn hard_edges_wall_off() {
        let mut grid = TileGrid::new(3, 3);
        let mut t = TileBehaviors::OPEN;
        t.edges.right = true;
        grid.set(0, 1, t);
        assert_eq!(classify(&grid, (8, 24), (16, 24)), LedgeRelation::Walled);
        assert_eq!(classify(&grid, (20, 24), (15, 24)), LedgeRelation::Walled);
        assert_eq!(classify(&grid, (8, 24), (8, 32)), LedgeRelation::Level);
    }

    #[test]
    fn diagonal_line_is_deterministic() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(1, 1, TileBehaviors::diagonal(DiagonalLedge::DownRight));
        // Line through tile (1, 1): x + y = 47.
        let anchor = (20, 20);
        assert_eq!(classify(&grid, anchor, (24, 23)), LedgeRelation::Level); // on the line
        assert_eq!(classify(&grid, anchor, (24, 24)), LedgeRelation::Above);
        for _ in 0..4 {
            assert_eq!(classify(&grid, (28, 28), (27, 20)), LedgeRelation::Under);
        }
    }

    #[test]
    fn diagonal_overrides_axis_flags_on_its_tile() {
        let mut grid = TileGrid::new(3, 3);
        let mut t = TileBehaviors::diagonal(DiagonalLedge::DownRight);
        t.ledges.left = Some(true);
        grid.set(1, 1, t);
        // High-side pixel in tile (1,1) to the left neighbour: the left flag is ignored.
        assert_eq!(classify(&grid, (17, 17), (15, 17)), LedgeRelation::Level);
    }
}

//! Tile behaviors and the read-only tile grid.
//!
//! World space is pixel-addressed and tiles are fixed 16×16 cells.
//! A grid cell either carries a `TileBehaviors` record or is absent,
//! which means fully open ground. Callers never see the `Option`:
//! `TileGrid::behaviors_at` maps absent cells to `TileBehaviors::OPEN`
//! and cells outside the grid to `TileBehaviors::WALL`, so tile
//! semantics stay centralized here.

use super::entity::Direction;

pub const TILE_SIZE: i32 = 16;

/// Tile coordinate of a pixel coordinate (floor division, negative-safe).
#[inline]
pub fn tile_of(pixel: i32) -> i32 {
    pixel.div_euclid(TILE_SIZE)
}

// ══════════════════════════════════════════════════════════════
// Ledge / edge flags
// ══════════════════════════════════════════════════════════════

/// Directional one-way markers on the four sides of a tile.
///
/// `Some(true)` on a side: an actor may jump *out* of this tile across
/// that side (this tile is the high side).
/// `Some(false)` on a side: entry into this tile across that side needs
/// a jump (this tile is the low side).
/// `None`: the side is not a ledge.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Ledges {
    pub up: Option<bool>,
    pub down: Option<bool>,
    pub left: Option<bool>,
    pub right: Option<bool>,
}

impl Ledges {
    pub const NONE: Ledges = Ledges { up: None, down: None, left: None, right: None };

    pub fn side(&self, side: Direction) -> Option<bool> {
        match side {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Direction, value: Option<bool>) {
        match side {
            Direction::Up => self.up = value,
            Direction::Down => self.down = value,
            Direction::Left => self.left = value,
            Direction::Right => self.right = value,
        }
    }
}

/// Hard directional blocks. Unlike ledges these cannot be jumped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Edges {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub const NONE: Edges = Edges { up: false, down: false, left: false, right: false };

    pub fn side(&self, side: Direction) -> bool {
        match side {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Direction, value: bool) {
        match side {
            Direction::Up => self.up = value,
            Direction::Down => self.down = value,
            Direction::Left => self.left = value,
            Direction::Right => self.right = value,
        }
    }
}

/// A 45° one-way boundary through a tile, named by the direction an
/// actor jumps when it drops off it.
///
/// ```text
///   UpLeft / DownRight          UpRight / DownLeft
///   line x + y = 15 + 16(tx+ty)  line y - x = 16(ty-tx)
///   . . . /                      \ . . .
///   . . / .                      . \ . .
///   . / . .                      . . \ .
///   / . . .                      . . . \
/// ```
///
/// Pixels exactly on the line belong to the high side (the lip).
/// All comparisons are exact integer arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiagonalLedge {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl DiagonalLedge {
    /// Line constant `N` for the tile at `(tx, ty)`.
    pub fn boundary(self, tx: i32, ty: i32) -> i32 {
        match self {
            DiagonalLedge::UpLeft | DiagonalLedge::DownRight => 15 + TILE_SIZE * (tx + ty),
            DiagonalLedge::UpRight | DiagonalLedge::DownLeft => TILE_SIZE * (ty - tx),
        }
    }

    /// Is pixel `(x, y)` on the low side of this tile's boundary line?
    pub fn is_low_side(self, tx: i32, ty: i32, x: i32, y: i32) -> bool {
        let n = self.boundary(tx, ty);
        match self {
            DiagonalLedge::DownRight => x + y > n,
            DiagonalLedge::UpLeft => x + y < n,
            DiagonalLedge::DownLeft => y - x > n,
            DiagonalLedge::UpRight => y - x < n,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// TileBehaviors
// ══════════════════════════════════════════════════════════════

/// Static per-tile metadata. Read-only for the duration of a frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TileBehaviors {
    pub solid: bool,
    pub pit: bool,
    pub water: bool,
    pub climbable: bool,
    /// Damage dealt on contact. Only meaningful on solid tiles.
    pub damage: u32,
    pub ledges: Ledges,
    /// Overrides this tile's own axis-aligned `ledges`.
    pub diagonal_ledge: Option<DiagonalLedge>,
    /// Forces the direction of a jump started from this tile.
    pub jump_direction: Option<Direction>,
    /// Jumps may not land on this tile.
    pub cannot_land: bool,
    pub edges: Edges,
}

impl TileBehaviors {
    pub const OPEN: TileBehaviors = TileBehaviors {
        solid: false,
        pit: false,
        water: false,
        climbable: false,
        damage: 0,
        ledges: Ledges::NONE,
        diagonal_ledge: None,
        jump_direction: None,
        cannot_land: false,
        edges: Edges::NONE,
    };

    /// What lies beyond the grid.
    pub const WALL: TileBehaviors = TileBehaviors { solid: true, ..TileBehaviors::OPEN };

    pub fn wall() -> Self { Self::WALL }

    pub fn pit() -> Self { TileBehaviors { pit: true, ..Self::OPEN } }

    pub fn water() -> Self { TileBehaviors { water: true, ..Self::OPEN } }

    pub fn climbable() -> Self { TileBehaviors { climbable: true, ..Self::OPEN } }

    pub fn spikes(damage: u32) -> Self { TileBehaviors { solid: true, damage, ..Self::OPEN } }

    pub fn ledge(side: Direction, value: bool) -> Self {
        let mut b = Self::OPEN;
        b.ledges.set(side, Some(value));
        b
    }

    pub fn diagonal(ledge: DiagonalLedge) -> Self {
        TileBehaviors { diagonal_ledge: Some(ledge), ..Self::OPEN }
    }

    /// Axis-aligned ledge flag on `side`, suppressed when the tile carries
    /// a diagonal ledge.
    #[inline]
    pub fn ledge_flag(&self, side: Direction) -> Option<bool> {
        if self.diagonal_ledge.is_some() {
            return None;
        }
        self.ledges.side(side)
    }

    #[inline]
    pub fn edge_flag(&self, side: Direction) -> bool {
        self.edges.side(side)
    }

    /// Solid and harmful.
    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.solid && self.damage > 0
    }
}

// ══════════════════════════════════════════════════════════════
// TileGrid
// ══════════════════════════════════════════════════════════════

/// Row-major grid of optional tile behaviors, owned by the area layer.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<TileBehaviors>>,
}

impl TileGrid {
    /// An all-open grid of `width × height` tiles.
    pub fn new(width: usize, height: usize) -> Self {
        TileGrid { width, height, cells: vec![None; width * height] }
    }

    pub fn width(&self) -> usize { self.width }

    pub fn height(&self) -> usize { self.height }

    /// Grid size in pixels.
    pub fn pixel_size(&self) -> (i32, i32) {
        (self.width as i32 * TILE_SIZE, self.height as i32 * TILE_SIZE)
    }

    #[inline]
    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return None;
        }
        Some(ty as usize * self.width + tx as usize)
    }

    /// Place behaviors on a tile. Out-of-grid writes are ignored.
    pub fn set(&mut self, tx: usize, ty: usize, behaviors: TileBehaviors) {
        if let Some(i) = self.index(tx as i32, ty as i32) {
            self.cells[i] = Some(behaviors);
        }
    }

    /// Revert a tile to open ground.
    pub fn clear(&mut self, tx: usize, ty: usize) {
        if let Some(i) = self.index(tx as i32, ty as i32) {
            self.cells[i] = None;
        }
    }

    /// Raw cell: `None` for open ground or outside the grid.
    pub fn get(&self, tx: i32, ty: i32) -> Option<&TileBehaviors> {
        self.index(tx, ty).and_then(|i| self.cells[i].as_ref())
    }

    /// Behaviors of the tile at `(tx, ty)`.
    #[inline]
    pub fn behaviors_at(&self, tx: i32, ty: i32) -> &TileBehaviors {
        match self.index(tx, ty) {
            Some(i) => self.cells[i].as_ref().unwrap_or(&TileBehaviors::OPEN),
            None => &TileBehaviors::WALL,
        }
    }

    /// Behaviors of the tile containing pixel `(x, y)`.
    #[inline]
    pub fn behaviors_at_pixel(&self, x: i32, y: i32) -> &TileBehaviors {
        self.behaviors_at(tile_of(x), tile_of(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_of_floors_negative_pixels() {
        assert_eq!(tile_of(0), 0);
        assert_eq!(tile_of(15), 0);
        assert_eq!(tile_of(16), 1);
        assert_eq!(tile_of(-1), -1);
        assert_eq!(tile_of(-16), -1);
        assert_eq!(tile_of(-17), -2);
    }

    #[test]
    fn absent_cell_is_open_ground() {
        let grid = TileGrid::new(4, 4);
        assert_eq!(*grid.behaviors_at(1, 1), TileBehaviors::OPEN);
        assert!(grid.get(1, 1).is_none());
    }

    #[test]
    fn outside_grid_is_wall() {
        let grid = TileGrid::new(2, 2);
        assert!(grid.behaviors_at(-1, 0).solid);
        assert!(grid.behaviors_at(2, 0).solid);
        assert!(grid.behaviors_at_pixel(32, 0).solid);
        assert!(!grid.behaviors_at_pixel(31, 31).solid);
    }

    #[test]
    fn set_and_clear() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(2, 1, TileBehaviors::wall());
        assert!(grid.behaviors_at(2, 1).solid);
        grid.clear(2, 1);
        assert!(!grid.behaviors_at(2, 1).solid);
        // Ignored, no panic.
        grid.set(9, 9, TileBehaviors::wall());
    }

    #[test]
    fn diagonal_ledge_suppresses_axis_flags() {
        let mut b = TileBehaviors::ledge(Direction::Down, true);
        assert_eq!(b.ledge_flag(Direction::Down), Some(true));
        b.diagonal_ledge = Some(DiagonalLedge::DownRight);
        assert_eq!(b.ledge_flag(Direction::Down), None);
    }

    #[test]
    fn down_right_line_is_exact() {
        // Tile (2, 3): N = 15 + 16 * 5 = 95.
        let d = DiagonalLedge::DownRight;
        assert_eq!(d.boundary(2, 3), 95);
        assert!(!d.is_low_side(2, 3, 47, 48)); // on the line: lip
        assert!(d.is_low_side(2, 3, 48, 48));
        assert!(!d.is_low_side(2, 3, 46, 48));
        for _ in 0..3 {
            assert!(!d.is_low_side(2, 3, 40, 55));
        }
    }

    #[test]
    fn up_right_and_down_left_mirror() {
        // Tile (1, 1): M = 0, line y == x.
        assert!(DiagonalLedge::UpRight.is_low_side(1, 1, 20, 18));
        assert!(!DiagonalLedge::UpRight.is_low_side(1, 1, 20, 20));
        assert!(DiagonalLedge::DownLeft.is_low_side(1, 1, 18, 20));
        assert!(!DiagonalLedge::DownLeft.is_low_side(1, 1, 20, 20));
    }

    #[test]
    fn spikes_are_hazards() {
        assert!(TileBehaviors::spikes(2).is_hazard());
        assert!(!TileBehaviors::wall().is_hazard());
        assert!(!TileBehaviors { damage: 3, ..TileBehaviors::OPEN }.is_hazard());
    }
}

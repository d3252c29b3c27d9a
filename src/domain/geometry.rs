//! Hitboxes and their integer pixel footprint.
//!
//! Positions are fractional, but collision always works on floored,
//! inclusive pixel bounds: `left = floor(x)`, `right = left + w - 1`.

use super::entity::Direction;

/// Axis-aligned rectangle in world pixels. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Finite, and at least one pixel in each dimension.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w >= 1.0
            && self.h >= 1.0
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }

    pub fn bounds(&self) -> PixelBounds {
        let left = self.x.floor() as i32;
        let top = self.y.floor() as i32;
        PixelBounds {
            left,
            top,
            right: left + self.w.floor() as i32 - 1,
            bottom: top + self.h.floor() as i32 - 1,
        }
    }

    /// Midpoint pixel, used for ledge classification.
    pub fn anchor(&self) -> (i32, i32) {
        self.bounds().anchor()
    }

    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        self.bounds().contains(x, y)
    }
}

/// Inclusive integer pixel bounds of a hitbox.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PixelBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelBounds {
    pub fn width(&self) -> i32 { self.right - self.left + 1 }

    pub fn height(&self) -> i32 { self.bottom - self.top + 1 }

    pub fn anchor(&self) -> (i32, i32) {
        (self.left + self.width() / 2, self.top + self.height() / 2)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> PixelBounds {
        PixelBounds {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// The row or column of pixels just outside this box in `dir`.
    pub fn leading_edge(&self, dir: Direction) -> LeadingEdge {
        match dir {
            Direction::Up => LeadingEdge { dir, fixed: self.top - 1, lo: self.left, hi: self.right },
            Direction::Down => LeadingEdge { dir, fixed: self.bottom + 1, lo: self.left, hi: self.right },
            Direction::Left => LeadingEdge { dir, fixed: self.left - 1, lo: self.top, hi: self.bottom },
            Direction::Right => LeadingEdge { dir, fixed: self.right + 1, lo: self.top, hi: self.bottom },
        }
    }

    /// Every pixel inside the box, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.top..=self.bottom).flat_map(move |y| (self.left..=self.right).map(move |x| (x, y)))
    }
}

/// A one-pixel-thick strip adjacent to a hitbox. `fixed` is the coordinate
/// along the travel axis; `lo..=hi` spans the lateral axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LeadingEdge {
    pub dir: Direction,
    pub fixed: i32,
    pub lo: i32,
    pub hi: i32,
}

impl LeadingEdge {
    /// World pixel at lateral coordinate `lateral`.
    pub fn pixel(&self, lateral: i32) -> (i32, i32) {
        if self.dir.is_horizontal() {
            (self.fixed, lateral)
        } else {
            (lateral, self.fixed)
        }
    }

    pub fn span(&self) -> i32 {
        self.hi - self.lo + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_floor_fractional_positions() {
        let r = Rect::new(100.7, 31.2, 16.0, 16.0);
        let b = r.bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (100, 31, 115, 46));
        assert_eq!(b.anchor(), (108, 39));
    }

    #[test]
    fn negative_positions_floor_down() {
        let b = Rect::new(-0.5, -3.0, 4.0, 4.0).bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (-1, -3, 2, 0));
    }

    #[test]
    fn one_pixel_box_anchors_inside() {
        let b = Rect::new(5.9, 5.9, 1.0, 1.0).bounds();
        assert_eq!(b.anchor(), (5, 5));
        assert!(b.contains(5, 5));
    }

    #[test]
    fn leading_edges() {
        let b = Rect::new(16.0, 32.0, 16.0, 8.0).bounds();
        let down = b.leading_edge(Direction::Down);
        assert_eq!((down.fixed, down.lo, down.hi), (40, 16, 31));
        assert_eq!(down.pixel(20), (20, 40));
        let left = b.leading_edge(Direction::Left);
        assert_eq!((left.fixed, left.lo, left.hi), (15, 32, 39));
        assert_eq!(left.pixel(33), (15, 33));
        assert_eq!(left.span(), 8);
    }

    #[test]
    fn invalid_rects() {
        assert!(!Rect::new(0.0, 0.0, 0.0, 16.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 16.0, -2.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 16.0, 16.0).is_valid());
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn pixel_iteration_covers_box() {
        let b = Rect::new(0.0, 0.0, 3.0, 2.0).bounds();
        assert_eq!(b.pixels().count(), 6);
    }
}

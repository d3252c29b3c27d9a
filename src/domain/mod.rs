//! Pure movement rules: tiles, ledges, the blocked-pixel predicate,
//! directional scanners, and the resolver built on them.

pub mod action;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod ledge;
pub mod physics;
pub mod resolver;
pub mod rules;
pub mod tile;

/// Tile grid from ASCII rows, using the level legend.
#[cfg(test)]
pub(crate) fn grid_from(rows: &[&str]) -> tile::TileGrid {
    crate::sim::level::parse_level(&rows.join("\n"))
        .expect("test grid parses")
        .tiles
}

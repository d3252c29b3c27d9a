//! ASCII level loader.
//!
//! ## Format (`.txt`):
//!   Optional line 1: `# Level Name`
//!   Lines: map rows, one glyph per 16×16 tile. Short rows are padded
//!   with open ground.
//!
//! ## Tile legend:
//!   '.' ' ' = Open               '#' = Solid
//!   'X' = Spikes (damage 1)      'O' = Pit
//!   '~' = Water                  'H' = Climbable
//!   '^' 'v' '<' '>' = Ledge, jump out across that side
//!   '7' '9' '1' '3' = Diagonal ledge up-left / up-right / down-left / down-right
//!   '_' = Open, no landing       'B' = Pushable block
//!   'P' = Hero spawn

use std::path::Path;

use anyhow::{bail, Context};

use crate::domain::entity::Direction;
use crate::domain::tile::{DiagonalLedge, TileBehaviors, TileGrid};

/// A parsed level: tiles plus spawn points, in tile coordinates.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub tiles: TileGrid,
    pub hero: Option<(usize, usize)>,
    pub blocks: Vec<(usize, usize)>,
}

enum Glyph {
    Tile(Option<TileBehaviors>),
    Block,
    Hero,
}

fn glyph(c: char) -> Option<Glyph> {
    let tile = match c {
        '.' | ' ' => None,
        '#' => Some(TileBehaviors::wall()),
        'X' => Some(TileBehaviors::spikes(1)),
        'O' => Some(TileBehaviors::pit()),
        '~' => Some(TileBehaviors::water()),
        'H' => Some(TileBehaviors::climbable()),
        '^' => Some(TileBehaviors::ledge(Direction::Up, true)),
        'v' => Some(TileBehaviors::ledge(Direction::Down, true)),
        '<' => Some(TileBehaviors::ledge(Direction::Left, true)),
        '>' => Some(TileBehaviors::ledge(Direction::Right, true)),
        '7' => Some(TileBehaviors::diagonal(DiagonalLedge::UpLeft)),
        '9' => Some(TileBehaviors::diagonal(DiagonalLedge::UpRight)),
        '1' => Some(TileBehaviors::diagonal(DiagonalLedge::DownLeft)),
        '3' => Some(TileBehaviors::diagonal(DiagonalLedge::DownRight)),
        '_' => Some(TileBehaviors { cannot_land: true, ..TileBehaviors::OPEN }),
        'B' => return Some(Glyph::Block),
        'P' => return Some(Glyph::Hero),
        _ => return None,
    };
    Some(Glyph::Tile(tile))
}

/// Distinguish `# Cave` from `#..#` (level data).
/// A name line starts with `#` and holds a character outside the legend.
fn is_name_line(line: &str) -> bool {
    line.starts_with('#') && line.chars().any(|c| glyph(c).is_none())
}

/// Parse a level from text.
pub fn parse_level(content: &str) -> anyhow::Result<Level> {
    let mut lines = content.lines().peekable();
    let mut name = String::new();
    if let Some(first) = lines.peek() {
        if is_name_line(first) {
            name = first[1..].trim().to_string();
            lines.next();
        }
    }

    let mut rows: Vec<&str> = lines.collect();
    while rows.last().is_some_and(|r| r.trim().is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        bail!("level has no map rows");
    }

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut level = Level {
        name: if name.is_empty() { "Untitled".to_string() } else { name },
        tiles: TileGrid::new(width, rows.len()),
        hero: None,
        blocks: vec![],
    };

    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            match glyph(c) {
                Some(Glyph::Tile(Some(behaviors))) => level.tiles.set(x, y, behaviors),
                Some(Glyph::Tile(None)) => {}
                Some(Glyph::Block) => level.blocks.push((x, y)),
                Some(Glyph::Hero) => {
                    if level.hero.is_some() {
                        bail!("second hero spawn at row {}, column {}", y + 1, x + 1);
                    }
                    level.hero = Some((x, y));
                }
                None => bail!("unknown glyph {c:?} at row {}, column {}", y + 1, x + 1),
            }
        }
    }
    Ok(level)
}

/// Load and parse a level file.
pub fn load_level_file(path: &Path) -> anyhow::Result<Level> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading level {}", path.display()))?;
    parse_level(&text).with_context(|| format!("parsing level {}", path.display()))
}

/// The level used when no file is configured.
pub fn builtin_level() -> anyhow::Result<Level> {
    parse_level(BUILTIN_LEVEL)
}

const BUILTIN_LEVEL: &str = "\
# Ledge Garden
########################
#P.....#.......~~~~....#
#......#..B....~~~~....#
#vvvvv.#.......~~~~....#
#......#...............#
#......###.####...B....#
#....3...........9.....#
#...3.....XXX.....9....#
#..3...............9...#
#......_..OOO..........#
#..HH.....OOO....>.....#
#..HH............>.....#
#......B.........>.....#
########################
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_level_parses() {
        let level = builtin_level().unwrap();
        assert_eq!(level.name, "Ledge Garden");
        assert_eq!(level.tiles.width(), 24);
        assert_eq!(level.tiles.height(), 14);
        assert_eq!(level.hero, Some((1, 1)));
        assert_eq!(level.blocks.len(), 3);
    }

    #[test]
    fn legend_maps_behaviors() {
        let level = parse_level("#vX\n3_O").unwrap();
        let t = &level.tiles;
        assert!(t.behaviors_at(0, 0).solid);
        assert_eq!(t.behaviors_at(1, 0).ledges.down, Some(true));
        assert_eq!(t.behaviors_at(2, 0).damage, 1);
        assert_eq!(t.behaviors_at(0, 1).diagonal_ledge, Some(DiagonalLedge::DownRight));
        assert!(t.behaviors_at(1, 1).cannot_land);
        assert!(t.behaviors_at(2, 1).pit);
    }

    #[test]
    fn data_row_starting_with_hash_is_not_a_name() {
        let level = parse_level("#X#\n...").unwrap();
        assert_eq!(level.name, "Untitled");
        assert_eq!(level.tiles.height(), 2);
    }

    #[test]
    fn short_rows_are_padded() {
        let level = parse_level("# Pad\n....\n.").unwrap();
        assert_eq!(level.tiles.width(), 4);
        assert!(!level.tiles.behaviors_at(3, 1).solid);
    }

    #[test]
    fn unknown_glyph_is_an_error() {
        let err = parse_level("..\n.Z").unwrap_err();
        assert!(err.to_string().contains("row 2, column 2"));
    }

    #[test]
    fn empty_level_is_an_error() {
        assert!(parse_level("# Nothing\n\n").is_err());
    }

    #[test]
    fn two_heroes_rejected() {
        assert!(parse_level("P.P").is_err());
    }
}

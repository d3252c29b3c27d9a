//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Compose the next frame into `front` (a grid of `Cell`)
//!   2. Compare each cell with `back` (the previous frame)
//!   3. Only emit terminal commands for cells that changed
//!   4. Batch everything with `queue!`, flush once, swap buffers
//!
//! One tile is drawn as two terminal columns. Actors are drawn on the
//! tile under their anchor; the status line carries exact pixels.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use ledgewalk::domain::entity::Action;
use ledgewalk::domain::tile::{tile_of, DiagonalLedge, TileBehaviors};
use ledgewalk::sim::world::World;

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };
    /// Never equal to a composed cell, so every position repaints.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Tile look ──

const CELL_W: usize = 2;
const MAP_ROW: usize = 1;

fn tile_look(t: &TileBehaviors) -> (&'static str, Color, Color) {
    if t.is_hazard() {
        return ("▲▲", Color::Red, BASE_BG);
    }
    if t.climbable {
        return ("╫╫", Color::Rgb { r: 170, g: 120, b: 60 }, BASE_BG);
    }
    if t.solid {
        return ("██", Color::Grey, BASE_BG);
    }
    if t.pit {
        return ("  ", Color::Black, Color::Black);
    }
    if t.water {
        return ("≈≈", Color::Cyan, Color::DarkBlue);
    }
    if let Some(d) = t.diagonal_ledge {
        let s = match d {
            DiagonalLedge::UpLeft | DiagonalLedge::DownRight => "╱╱",
            DiagonalLedge::UpRight | DiagonalLedge::DownLeft => "╲╲",
        };
        return (s, Color::Yellow, BASE_BG);
    }
    let l = t.ledges;
    let ledge = [(l.up, "^^"), (l.down, "vv"), (l.left, "<<"), (l.right, ">>")]
        .into_iter()
        .find(|(flag, _)| flag.is_some());
    if let Some((_, s)) = ledge {
        return (s, Color::Yellow, BASE_BG);
    }
    if t.cannot_land {
        return ("__", Color::DarkGrey, BASE_BG);
    }
    ("· ", Color::DarkGrey, BASE_BG)
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &World, recent: &[String]) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.front.width || th != self.front.height {
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        self.front.cells.fill(Cell::BLANK);
        self.compose(world, recent);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn compose(&mut self, world: &World, recent: &[String]) {
        let title = format!(" {}  tick {}", world.level.name, world.tick);
        self.front.put_str(0, 0, &title, Color::White, BASE_BG);

        let (w, h) = (world.tiles.width(), world.tiles.height());
        for ty in 0..h {
            for tx in 0..w {
                let (s, fg, bg) = tile_look(world.tiles.behaviors_at(tx as i32, ty as i32));
                self.front.put_str(tx * CELL_W, MAP_ROW + ty, s, fg, bg);
            }
        }

        for block in &world.blocks {
            let (ax, ay) = block.hitbox.anchor();
            self.put_tile_str(ax, ay, "▣▣", Color::Rgb { r: 200, g: 160, b: 90 });
        }

        let hero = &world.hero;
        let (ax, ay) = hero.hitbox.anchor();
        let glyph = if hero.is_airborne() { "**" } else { "@@" };
        self.put_tile_str(ax, ay, glyph, Color::Green);

        // ── Status ──
        let row = MAP_ROW + h + 1;
        let action = match hero.action {
            Action::Idle => "idle".to_string(),
            Action::Pushing(d) => format!("pushing {d:?}"),
            Action::JumpingDown(arc) => format!("jumping {:?} z={:.1}", arc.direction, arc.z),
        };
        let status = format!(
            " pos ({:.1}, {:.1})  {}  charge {}ms  damage {}",
            hero.hitbox.x, hero.hitbox.y, action, hero.jump_charge_ms, hero.damage_taken
        );
        self.front.put_str(0, row, &status, Color::White, BASE_BG);
        for (i, line) in recent.iter().enumerate() {
            self.front.put_str(1, row + 1 + i, line, Color::DarkGrey, BASE_BG);
        }
        let help = " arrows/WASD move   R restart   Q quit";
        self.front.put_str(0, row + 2 + recent.len(), help, Color::DarkCyan, BASE_BG);
    }

    fn put_tile_str(&mut self, px: i32, py: i32, s: &str, fg: Color) {
        let (tx, ty) = (tile_of(px), tile_of(py));
        if tx < 0 || ty < 0 {
            return;
        }
        self.front.put_str(tx as usize * CELL_W, MAP_ROW + ty as usize, s, fg, BASE_BG);
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let i = y * self.front.width + x;
                let cell = self.front.cells[i];
                if cell == self.back.cells[i] {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }
        self.writer.flush()
    }
}

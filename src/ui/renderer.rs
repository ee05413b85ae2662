/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// One tile = 2 terminal columns × 1 row. The player sprite is one tile
/// wide and two tall; a crouching body is drawn in the lower row only.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use ladders::domain::entity::{Facing, PlayerState, SPRITE_SIZE};
use ladders::domain::tile::{TileKind, TILE_SIZE};
use ladders::sim::world::{MaskTiming, World};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, matching the Clear color.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

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
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }
}

// ── Renderer ──

/// Terminal columns per tile.
const CELL_W: usize = 2;

/// Vertical layout
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns true if the
    /// terminal will report key Release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame
        self.back.cells.fill(Cell::INVALID);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &World) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose_hud(world);
        self.compose_map(world);
        self.compose_player(world);
        self.compose_help(world);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
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
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &World) {
        let p = &w.player;
        let facing = match p.facing {
            Facing::Left => '<',
            Facing::Right => '>',
        };
        let line = format!(
            "{}  {:<9} {}  anim {}#{}  ladder {}  top {}  floor {}",
            w.level_name,
            p.state.name(),
            facing,
            w.animator.clip().name,
            w.animator.frame(),
            flag(p.on_ladder_tile),
            flag(p.on_ladder_top),
            flag(w.grounded),
        );
        self.front.put_str(0, HUD_ROW, &line, Color::White);
    }

    fn compose_map(&mut self, w: &World) {
        for tile in w.grid.iter() {
            let (glyph, fg) = match tile.kind {
                TileKind::Empty => continue,
                TileKind::Floor => (['=', '='], Color::Grey),
                TileKind::Brick => (['#', '#'], Color::DarkRed),
                TileKind::Ladder => (['|', '|'], Color::DarkYellow),
                TileKind::LadderTop if tile.collides.any() => (['T', 'T'], Color::Yellow),
                TileKind::LadderTop => (['t', 't'], Color::DarkGrey),
            };
            let col = tile.x * CELL_W;
            let row = MAP_ROW + tile.y;
            self.front.set(col, row, Cell::new(glyph[0], fg));
            self.front.set(col + 1, row, Cell::new(glyph[1], fg));
        }
    }

    fn compose_player(&mut self, w: &World) {
        let p = &w.player;
        let left = p.position.x - SPRITE_SIZE.x / 2.0;
        let top = p.position.y - SPRITE_SIZE.y / 2.0;
        if left < 0.0 || top < 0.0 {
            return;
        }

        let col = (left / TILE_SIZE).round() as usize * CELL_W;
        let row = MAP_ROW + (top / TILE_SIZE).round() as usize;

        let (head, body) = sprite(p.state, p.facing);
        let fg = Color::Cyan;
        if let Some(head) = head {
            self.front.put_str(col, row, head, fg);
        }
        self.front.put_str(col, row + 1, body, fg);
    }

    fn compose_help(&mut self, w: &World) {
        let row = MAP_ROW + w.grid.height() + 1;
        let timing = match w.options.mask_timing {
            MaskTiming::Lagged => "lagged",
            MaskTiming::Immediate => "immediate",
        };
        let help = format!(
            "[←→] walk  [↑↓] climb/crouch  [W/Space] jump  [R] restart  [Q/Esc] quit   tick {}  mask {}",
            w.tick, timing
        );
        self.front.put_str(0, row, &help, Color::DarkGrey);
    }
}

fn flag(on: bool) -> char {
    if on { '●' } else { '·' }
}

/// Two-column glyphs for the sprite's upper and lower tile.
fn sprite(state: PlayerState, facing: Facing) -> (Option<&'static str>, &'static str) {
    let head = match facing {
        Facing::Left => "<o",
        Facing::Right => "o>",
    };
    match state {
        PlayerState::Crouching => (None, "oo"),
        PlayerState::Climbing | PlayerState::OnLadder => (Some("[o"), "/]"),
        PlayerState::Jumping => (Some(head), "/\\"),
        PlayerState::Falling => (Some(head), "\\/"),
        PlayerState::Walking => (Some(head), "/|"),
        PlayerState::Standing => (Some(head), "||"),
    }
}

/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Map the 960×600 world onto the terminal grid (`Viewport`)
///   2. Compose the next frame into the `front` buffer
///   3. Compare each cell with `back` (previous frame)
///   4. Only emit terminal commands for cells that changed, batched with
///      `queue!` and flushed once
///   5. Swap front/back
///
/// World pixels are scaled independently on each axis, so the whole level
/// always fits the terminal. Every entity covers at least one cell.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::anim::Animatable;
use crate::domain::assets::{self, PlatformImage};
use crate::domain::entity::{Intent, WallSide};
use crate::domain::geom::{Aabb, Vec2};
use crate::domain::physics::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::sim::hud::{glyph_frame, HUD_OFFSET};
use crate::sim::world::Session;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell. Using the same RGB for
    /// `Clear(ClearType::All)` keeps inter-row gaps the same colour.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition; forces a full repaint when in `back`.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }

    fn with_bg(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
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

    fn fill(&mut self, span: CellSpan, cell: Cell) {
        for y in span.row0..=span.row1 {
            for x in span.col0..=span.col1 {
                self.set(x, y, cell);
            }
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }
}

// ── Viewport: world pixels → terminal cells ──

/// Inclusive cell rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CellSpan {
    col0: usize,
    col1: usize,
    row0: usize,
    row1: usize,
}

#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: usize,
    rows: usize,
    /// World pixels per column / row.
    px_per_col: f32,
    px_per_row: f32,
}

impl Viewport {
    fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Viewport {
            cols,
            rows,
            px_per_col: WORLD_WIDTH / cols as f32,
            px_per_row: WORLD_HEIGHT / rows as f32,
        }
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let col = (p.x / self.px_per_col).floor().clamp(0.0, (self.cols - 1) as f32);
        let row = (p.y / self.px_per_row).floor().clamp(0.0, (self.rows - 1) as f32);
        (col as usize, row as usize)
    }

    /// Cells covered by a box. `None` when the box is entirely off-world.
    fn span(&self, b: &Aabb) -> Option<CellSpan> {
        if b.right() <= 0.0 || b.left() >= WORLD_WIDTH || b.bottom() <= 0.0 || b.top() >= WORLD_HEIGHT {
            return None;
        }
        let (col0, row0) = self.cell_of(b.pos);
        // Exclusive far edge: a box ending exactly on a cell boundary does
        // not spill into the next cell.
        let far = Vec2::new(b.right() - 0.001, b.bottom() - 0.001);
        let (col1, row1) = self.cell_of(far);
        Some(CellSpan { col0, col1: col1.max(col0), row0, row1: row1.max(row0) })
    }
}

// ── Glyphs ──

const GROUND_COLOR: Color = Color::Rgb { r: 120, g: 84, b: 50 };
const GRASS_COLOR: Color = Color::Rgb { r: 70, g: 170, b: 60 };
const COIN_COLOR: Color = Color::Rgb { r: 250, g: 210, b: 60 };
const SPIDER_COLOR: Color = Color::Rgb { r: 200, g: 60, b: 200 };
const HERO_COLOR: Color = Color::Rgb { r: 90, g: 200, b: 250 };
const WALL_COLOR: Color = Color::DarkGrey;

fn platform_cell(image: PlatformImage) -> Cell {
    match image {
        PlatformImage::Ground => Cell::with_bg('▒', GRASS_COLOR, GROUND_COLOR),
        _ => Cell::with_bg('▔', Color::White, GRASS_COLOR),
    }
}

/// Coin sheet frames: face-on, three-quarter, edge.
fn coin_char(frame: u8) -> char {
    match frame {
        0 => 'O',
        1 => 'o',
        _ => '|',
    }
}

/// Spider sheet frames 0-2 crawl, 3 flattened, 4 flash.
fn spider_char(frame: u8) -> char {
    match frame {
        0 | 2 => 'M',
        1 => 'W',
        3 => '_',
        _ => '*',
    }
}

fn hero_char(intent: Intent) -> char {
    match intent {
        Intent::Left => '<',
        Intent::Idle => '@',
        Intent::Right => '>',
    }
}

// ── Composition (pure; no terminal access) ──

fn compose_session(buf: &mut FrameBuffer, vp: &Viewport, s: &Session, show_walls: bool) {
    if show_walls {
        for wall in &s.walls {
            let ch = match wall.side {
                WallSide::Left => '[',
                WallSide::Right => ']',
            };
            if let Some(span) = vp.span(&wall.body.bounds()) {
                buf.fill(span, Cell::new(ch, WALL_COLOR));
            }
        }
    }

    for platform in &s.platforms {
        if let Some(span) = vp.span(&platform.body.bounds()) {
            buf.fill(span, platform_cell(platform.image));
        }
    }

    for coin in s.coins.iter().filter(|c| c.alive) {
        if let Some(span) = vp.span(&coin.body.bounds()) {
            buf.fill(span, Cell::new(coin_char(coin.animator().frame()), COIN_COLOR));
        }
    }

    for spider in s.spiders.iter().filter(|sp| sp.is_visible()) {
        let fg = if spider.animator().current() == Some(assets::SPIDER_DIE.name) {
            Color::Red
        } else {
            SPIDER_COLOR
        };
        if let Some(span) = vp.span(&spider.body.bounds()) {
            buf.fill(span, Cell::new(spider_char(spider.animator().frame()), fg));
        }
    }

    if let Some(span) = vp.span(&s.hero.body.bounds()) {
        buf.fill(span, Cell::new(hero_char(s.hero.intent), HERO_COLOR));
    }

    compose_hud(buf, vp, s);
}

/// Coin icon then `x{count}`, anchored at the HUD offset.
fn compose_hud(buf: &mut FrameBuffer, vp: &Viewport, s: &Session) {
    let (col, row) = vp.cell_of(Vec2::new(HUD_OFFSET.0, HUD_OFFSET.1));
    let icon = Aabb::new(Vec2::new(HUD_OFFSET.0, HUD_OFFSET.1), assets::COIN_ICON_SIZE);
    let icon_w = vp.span(&icon).map_or(1, |sp| sp.col1 - sp.col0 + 1);
    for dx in 0..icon_w {
        buf.set(col + dx, row, Cell::new('O', COIN_COLOR));
    }
    // Only characters the numbers font can draw.
    let text: String = s.score.text().chars().filter(|&c| glyph_frame(c).is_some()).collect();
    buf.put_str(col + icon_w + 1, row, &text, Color::White);
}

fn compose_help(buf: &mut FrameBuffer, row: usize, s: &Session) {
    let help = format!(
        " ←/→ move   ↑/Space jump   Esc quit   coins left {}   attempt {}",
        s.coins_remaining(),
        s.attempt + 1,
    );
    buf.put_str(0, row, &help, Color::DarkGrey);
}

// ── Renderer ──

/// Rows below the playfield (help line).
const FOOTER_ROWS: usize = 1;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    show_walls: bool,
}

impl Renderer {
    pub fn new(show_walls: bool) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            show_walls,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        log::debug!("terminal {}x{}", self.term_w, self.term_h);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let field_rows = self.term_h.saturating_sub(FOOTER_ROWS).max(1);
        let vp = Viewport::new(self.term_w, field_rows);

        self.front.clear();
        compose_session(&mut self.front, &vp, session, self.show_walls);
        compose_help(&mut self.front, field_rows, session);

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

        // Explicit base colours; ResetColor would fall back to the terminal's
        // own default and show through as line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::domain::entity::SpiderState;
    use crate::sim::level::builtin_level;

    fn session() -> Session {
        Session::new(builtin_level().unwrap(), PhysicsConfig::default())
    }

    fn render_to_buffer(s: &Session, cols: usize, rows: usize, show_walls: bool) -> FrameBuffer {
        let mut buf = FrameBuffer::new(cols, rows);
        compose_session(&mut buf, &Viewport::new(cols, rows), s, show_walls);
        buf
    }

    fn count(buf: &FrameBuffer, pred: impl Fn(&Cell) -> bool) -> usize {
        buf.cells.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn whole_world_maps_onto_grid() {
        let vp = Viewport::new(96, 30);
        let all = Aabb::new(Vec2::ZERO, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));
        assert_eq!(vp.span(&all), Some(CellSpan { col0: 0, col1: 95, row0: 0, row1: 29 }));
    }

    #[test]
    fn boxes_on_cell_edges_do_not_spill() {
        let vp = Viewport::new(96, 30); // 10 × 20 px cells
        let b = Aabb::new(Vec2::new(10.0, 20.0), Vec2::new(20.0, 20.0));
        assert_eq!(vp.span(&b), Some(CellSpan { col0: 1, col1: 2, row0: 1, row1: 1 }));
    }

    #[test]
    fn tiny_boxes_still_cover_a_cell() {
        let vp = Viewport::new(10, 10);
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(1.0, 1.0));
        assert_eq!(vp.span(&b), Some(CellSpan { col0: 0, col1: 0, row0: 0, row1: 0 }));
    }

    #[test]
    fn off_world_boxes_are_skipped() {
        let vp = Viewport::new(96, 30);
        let wall = Aabb::new(Vec2::new(960.0, 482.0), assets::WALL_SIZE);
        assert_eq!(vp.span(&wall), None);
    }

    #[test]
    fn hud_shows_score() {
        let mut s = session();
        s.score.collect();
        s.score.collect();
        let buf = render_to_buffer(&s, 96, 30, false);
        let row: String = (0..buf.width).map(|x| buf.get(x, 0).ch).collect();
        assert!(row.contains("x2"), "HUD row was {row:?}");
    }

    #[test]
    fn dead_things_are_not_drawn() {
        let mut s = session();
        let before = render_to_buffer(&s, 192, 60, false);
        let coins_before = count(&before, |c| c.fg == COIN_COLOR);

        for coin in &mut s.coins { coin.alive = false; }
        for spider in &mut s.spiders { spider.state = SpiderState::Dead; }
        let after = render_to_buffer(&s, 192, 60, false);

        assert!(coins_before > count(&after, |c| c.fg == COIN_COLOR));
        assert_eq!(count(&after, |c| c.fg == SPIDER_COLOR || c.fg == Color::Red), 0);
    }

    #[test]
    fn walls_only_in_debug_view() {
        let s = session();
        let plain = render_to_buffer(&s, 192, 60, false);
        let debug = render_to_buffer(&s, 192, 60, true);
        assert_eq!(count(&plain, |c| c.fg == WALL_COLOR), 0);
        assert!(count(&debug, |c| c.ch == '[' || c.ch == ']') > 0);
    }
}

//! Terminal backend
//!
//! The 800x600 view is scaled onto the terminal grid. Sprites become blocks
//! of their frame's average color, text is printed over them. Each frame is
//! composed into a cell buffer and only cells that changed since the last
//! `present` are written out.

use std::io::Write;

use crossterm::{
    QueueableCommand,
    cursor::MoveTo,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::Vec2;

use super::{Renderer, Rgb, TextAnchor, TextSize};
use crate::assets::{Assets, SpriteId};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::GameError;
use crate::sim::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
        bold: false,
    };

    /// Never produced by drawing, so a buffer full of these repaints fully
    const INVALID: Cell = Cell {
        ch: '\0',
        fg: Rgb::BLACK,
        bg: Rgb::WHITE,
        bold: true,
    };
}

#[derive(Debug, Clone)]
struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        let i = self.index(col, row)?;
        self.cells.get_mut(i)
    }
}

fn blend(under: Rgb, over: Rgb, alpha: u8) -> Rgb {
    let mix = |a: u8, b: u8| {
        let a = a as u32;
        let b = b as u32;
        let t = alpha as u32;
        ((b * t + a * (255 - t)) / 255) as u8
    };
    Rgb::new(mix(under.r, over.r), mix(under.g, over.g), mix(under.b, over.b))
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Cell-grid renderer writing crossterm commands to `W`
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Average color per sprite frame
    palette: Vec<Vec<Rgb>>,
    front: CellGrid,
    back: CellGrid,
    /// Follow the real terminal size at the start of each frame
    track_terminal_size: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer with a fixed grid size
    pub fn with_size(out: W, assets: &Assets, cols: u16, rows: u16) -> Self {
        let palette = SpriteId::ALL
            .iter()
            .map(|&id| {
                let set = assets.frames(id);
                (0..set.len()).map(|i| set.get(i).color).collect()
            })
            .collect();
        let cols = cols.max(1) as usize;
        let rows = rows.max(1) as usize;
        let mut back = CellGrid::new(cols, rows);
        back.fill(Cell::INVALID);
        Self {
            out,
            palette,
            front: CellGrid::new(cols, rows),
            back,
            track_terminal_size: false,
        }
    }

    /// Renderer that resizes itself to the attached terminal
    pub fn new(out: W, assets: &Assets) -> Self {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let mut renderer = Self::with_size(out, assets, cols, rows);
        renderer.track_terminal_size = true;
        renderer
    }

    pub fn size(&self) -> (usize, usize) {
        (self.front.cols, self.front.rows)
    }

    /// Composed but not yet presented cell
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.front.get(col, row).copied()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn resize(&mut self, cols: usize, rows: usize) -> Result<(), GameError> {
        if cols == self.front.cols && rows == self.front.rows {
            return Ok(());
        }
        log::debug!("Terminal resized to {cols}x{rows}");
        self.front = CellGrid::new(cols, rows);
        self.back = CellGrid::new(cols, rows);
        self.back.fill(Cell::INVALID);
        self.out.queue(Clear(ClearType::All))?;
        Ok(())
    }

    fn col_of(&self, x: f32) -> isize {
        (x * self.front.cols as f32 / SCREEN_WIDTH).floor() as isize
    }

    fn row_of(&self, y: f32) -> isize {
        (y * self.front.rows as f32 / SCREEN_HEIGHT).floor() as isize
    }

    /// Half-open cell span covering `[start, end)` in view units, at least
    /// one cell wide so small sprites stay visible
    fn span(start: isize, end_exclusive: isize, limit: usize) -> std::ops::Range<usize> {
        let end = end_exclusive.max(start + 1);
        let lo = start.clamp(0, limit as isize) as usize;
        let hi = end.clamp(0, limit as isize) as usize;
        lo..hi
    }

    fn sprite_color(&self, sprite: SpriteId, frame: usize) -> Rgb {
        self.palette
            .get(sprite.index())
            .filter(|frames| !frames.is_empty())
            .map_or(sprite.placeholder_color(), |frames| frames[frame % frames.len()])
    }

    fn flush_diff(&mut self) -> Result<(), GameError> {
        let mut last: Option<(Rgb, Rgb, bool)> = None;
        let mut cursor: Option<(usize, usize)> = None;

        for row in 0..self.front.rows {
            for col in 0..self.front.cols {
                let idx = row * self.front.cols + col;
                let cell = self.front.cells[idx];
                if cell == self.back.cells[idx] {
                    continue;
                }
                if cursor != Some((col, row)) {
                    self.out.queue(MoveTo(col as u16, row as u16))?;
                }
                if last != Some((cell.fg, cell.bg, cell.bold)) {
                    self.out.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    self.out.queue(SetForegroundColor(to_color(cell.fg)))?;
                    self.out.queue(SetBackgroundColor(to_color(cell.bg)))?;
                    last = Some((cell.fg, cell.bg, cell.bold));
                }
                self.out.queue(Print(cell.ch))?;
                cursor = Some((col + 1, row));
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_frame(&mut self) {
        if self.track_terminal_size {
            if let Ok((cols, rows)) = terminal::size() {
                if let Err(e) = self.resize(cols.max(1) as usize, rows.max(1) as usize) {
                    log::warn!("Resize failed: {e}");
                }
            }
        }
        self.front.fill(Cell::BLANK);
    }

    fn draw_sprite(&mut self, sprite: SpriteId, frame: usize, rect: Rect, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let color = self.sprite_color(sprite, frame);
        let cols = Self::span(
            self.col_of(rect.left()),
            self.col_of(rect.right()),
            self.front.cols,
        );
        let rows = Self::span(
            self.row_of(rect.top()),
            self.row_of(rect.bottom()),
            self.front.rows,
        );
        for row in rows {
            for col in cols.clone() {
                if let Some(cell) = self.front.get_mut(col, row) {
                    cell.bg = blend(cell.bg, color, alpha);
                    cell.ch = ' ';
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: TextAnchor, color: Rgb) {
        let row = self.row_of(pos.y);
        if row < 0 || row as usize >= self.front.rows {
            return;
        }
        let width = text.chars().count() as isize;
        let anchor_col = self.col_of(pos.x);
        let start = match anchor {
            TextAnchor::Left => anchor_col,
            TextAnchor::Center => anchor_col - width / 2,
            TextAnchor::Right => anchor_col - width,
        };
        let bold = size != TextSize::Small;
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as isize;
            if col < 0 {
                continue;
            }
            if let Some(cell) = self.front.get_mut(col as usize, row as usize) {
                cell.ch = ch;
                cell.fg = color;
                cell.bold = bold;
            }
        }
    }

    fn draw_overlay(&mut self, alpha: u8) {
        let keep = 255 - alpha;
        for cell in &mut self.front.cells {
            cell.fg = cell.fg.darken(keep);
            cell.bg = cell.bg.darken(keep);
        }
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

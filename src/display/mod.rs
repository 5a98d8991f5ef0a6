/// Rendering layer: all terminal output lives here.
///
/// The 960×660 pixel world is scaled onto the terminal grid.  A cell is
/// painted when any opaque pixel of the sprite falls inside it, so thin
/// projectiles stay visible at low resolution.  No game logic happens here.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{self, Attribute, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::error::PlatformError;
use crate::geometry::{Rect, HEIGHT, WIDTH};
use crate::platform::{Align, Audio, FontSize, Renderer, TextPos};
use crate::sprites::{SoundId, SpriteId, SpriteSheet};

pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 16;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SHIP: Color = Color::White;
const C_MOB: Color = Color::Green;
const C_LASER: Color = Color::Red;
const C_BOMB: Color = Color::Green;
const C_POWERUP: Color = Color::Yellow;
const C_TEXT_SM: Color = Color::DarkGrey;
const C_TEXT_MD: Color = Color::White;
const C_TEXT_LG: Color = Color::Yellow;
const C_BANNER: Color = Color::Cyan;

fn glyph(sprite: SpriteId) -> (&'static str, Color) {
    match sprite {
        SpriteId::Ship => ("█", C_SHIP),
        SpriteId::Mob => ("▓", C_MOB),
        SpriteId::Laser => ("║", C_LASER),
        SpriteId::Bomb => ("↓", C_BOMB),
        SpriteId::ShieldPowerUp => ("◆", C_POWERUP),
    }
}

// ── Terminal lifecycle ────────────────────────────────────────────────────────

/// Raw mode, alternate screen, hidden cursor.  Returns whether the terminal
/// accepted key-release reporting.
pub fn enter_terminal<W: Write>(out: &mut W) -> io::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Only kitty-protocol terminals report releases
    if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return Ok(false);
    }
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(keyboard_enhanced)
}

/// Undo `enter_terminal`.  Best-effort: every step runs even if one fails.
pub fn leave_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    sheet: SpriteSheet,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Result<Self, PlatformError> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(PlatformError::TerminalTooSmall {
                cols,
                rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
            });
        }
        Ok(TerminalRenderer {
            out,
            cols,
            rows,
            sheet: SpriteSheet::new(),
        })
    }

    /// Size the grid from the current terminal.
    pub fn from_terminal(out: W) -> Result<Self, PlatformError> {
        let (cols, rows) = terminal::size()?;
        Self::new(out, cols, rows)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn col_of(&self, x: i32) -> i32 {
        x * self.cols as i32 / WIDTH
    }

    fn row_of(&self, y: i32) -> i32 {
        y * self.rows as i32 / HEIGHT
    }

    /// Pixel span `[start, end)` covered by a cell index along one axis.
    fn cell_span(cell: i32, cells: u16, pixels: i32) -> (i32, i32) {
        let start = cell * pixels / cells as i32;
        let end = (cell + 1) * pixels / cells as i32;
        (start, end.max(start + 1))
    }

    /// Does any opaque pixel of `sprite` at `footprint` fall in this cell?
    fn covers(&self, footprint: Rect, sprite: SpriteId, col: i32, row: i32) -> bool {
        let (x0, x1) = Self::cell_span(col, self.cols, WIDTH);
        let (y0, y1) = Self::cell_span(row, self.rows, HEIGHT);
        let cell = Rect::new(x0, y0, x1 - x0, y1 - y0);
        let Some(overlap) = cell.intersection(&footprint) else {
            return false;
        };
        let mask = self.sheet.mask(sprite);
        (overlap.top()..overlap.bottom()).any(|y| {
            (overlap.left()..overlap.right())
                .any(|x| mask.is_set(x - footprint.x, y - footprint.y))
        })
    }

    fn on_screen(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self) -> Result<(), PlatformError> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_sprite(&mut self, footprint: Rect, sprite: SpriteId) -> Result<(), PlatformError> {
        let (symbol, color) = glyph(sprite);
        self.out.queue(style::SetForegroundColor(color))?;

        let first_col = self.col_of(footprint.left());
        let last_col = self.col_of(footprint.right() - 1);
        let first_row = self.row_of(footprint.top());
        let last_row = self.row_of(footprint.bottom() - 1);

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                if self.on_screen(col, row) && self.covers(footprint, sprite, col, row) {
                    self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
                    self.out.queue(Print(symbol))?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, size: FontSize, at: TextPos) -> Result<(), PlatformError> {
        let width = text.chars().count() as i32;
        let row = self.row_of(at.y).clamp(0, self.rows as i32 - 1);
        let col = match at.align {
            Align::Left => self.col_of(at.x),
            Align::Right => self.col_of(at.x) - width,
        }
        .clamp(0, (self.cols as i32 - width).max(0));

        match size {
            FontSize::Small => {
                self.out.queue(style::SetForegroundColor(C_TEXT_SM))?;
            }
            FontSize::Medium => {
                self.out.queue(style::SetForegroundColor(C_TEXT_MD))?;
            }
            FontSize::Large => {
                self.out.queue(style::SetForegroundColor(C_TEXT_LG))?;
                self.out.queue(style::SetAttribute(Attribute::Bold))?;
            }
            FontSize::ExtraLarge => {
                // Boxed headline:
                //   ╔══════════╗
                //   ║  text    ║
                //   ╚══════════╝
                let inner = width as usize + 4;
                let col = col.clamp(0, (self.cols as i32 - inner as i32 - 2).max(0)) as u16;
                let row = row.max(1) as u16;
                self.out.queue(style::SetForegroundColor(C_BANNER))?;
                self.out.queue(style::SetAttribute(Attribute::Bold))?;
                self.out.queue(cursor::MoveTo(col, row - 1))?;
                self.out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(Print(format!("║  {text}  ║")))?;
                self.out.queue(cursor::MoveTo(col, row + 1))?;
                self.out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
                self.out.queue(style::SetAttribute(Attribute::Reset))?;
                return Ok(());
            }
        }

        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(Print(text))?;
        self.out.queue(style::SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Rings the terminal bell for the cues worth hearing.  Write errors are
/// ignored; sound is never fatal.
pub struct TerminalBell;

impl Audio for TerminalBell {
    fn play(&mut self, sound: SoundId) {
        if matches!(sound, SoundId::MobDestroyed | SoundId::ShieldHit | SoundId::PowerUp) {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }
}

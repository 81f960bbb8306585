//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The field is y-up with two hidden rows on top; only the visible rows are
//! drawn, bottom row last on screen.

use crate::core::{GameSnapshot, Piece};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, SessionState, FIELD_WIDTH, VISIBLE_HEIGHT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Values shown next to the field that are not part of the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub best_score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Field cell width in terminal columns.
    cell_w: u16,
    /// Field cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

const WELL_BG: Rgb = Rgb::new(30, 30, 40);

/// Top-left of the framed well in terminal cells.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        hud: &Hud,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let well_w = u16::from(FIELD_WIDTH) * self.cell_w;
        let well_h = u16::from(VISIBLE_HEIGHT) * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(well_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(well_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: well_w + 2,
            h: well_h + 2,
        };

        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: WELL_BG,
            bold: false,
            dim: false,
        };
        fb.fill_rect(frame.x + 1, frame.y + 1, well_w, well_h, ' ', bg);
        self.draw_border(fb, frame);

        if snap.session == SessionState::Title {
            self.draw_title(fb, frame, hud);
            return;
        }

        for y in 0..VISIBLE_HEIGHT {
            for x in 0..FIELD_WIDTH {
                let id = snap.field[y as usize][x as usize];
                match PieceKind::from_color_id(id) {
                    Some(kind) => self.draw_block(fb, frame, x as i8, y as i8, kind),
                    None => self.draw_empty_cell(fb, frame, x as i8, y as i8),
                }
            }
        }

        if let Some(ghost) = snap.ghost {
            let style = CellStyle {
                fg: Rgb::new(140, 140, 140),
                bg: WELL_BG,
                bold: false,
                dim: true,
            };
            for (x, y) in Piece::from(ghost).cells() {
                self.fill_field_cell(fb, frame, x, y, '░', style);
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in Piece::from(active).cells() {
                self.draw_block(fb, frame, x, y, active.kind);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, frame);

        if snap.session == SessionState::GameOver {
            self.draw_overlay(fb, frame, &["GAME OVER", "R restart", "Q quit"]);
        } else if snap.paused {
            self.draw_overlay(fb, frame, &["PAUSED"]);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: &Hud, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame) {
        let Frame { x, y, w, h } = frame;
        let style = CellStyle::default();

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8) {
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: WELL_BG,
            bold: false,
            dim: true,
        };
        self.fill_field_cell(fb, frame, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, kind: PieceKind) {
        let style = CellStyle {
            fg: piece_color(kind),
            bg: WELL_BG,
            bold: true,
            dim: false,
        };
        self.fill_field_cell(fb, frame, x, y, '█', style);
    }

    /// Fill one field cell. Cells outside the visible area are skipped.
    fn fill_field_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        if x < 0 || x >= FIELD_WIDTH as i8 || y < 0 || y >= VISIBLE_HEIGHT as i8 {
            return;
        }
        let row_from_top = (VISIBLE_HEIGHT as i8 - 1 - y) as u16;
        let px = frame.x + 1 + (x as u16) * self.cell_w;
        let py = frame.y + 1 + row_from_top * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: &Hud,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 8 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::default()
        };
        let dim = CellStyle { dim: true, ..value };

        let mut y = frame.y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("BEST", hud.best_score.max(snap.score)),
            ("LEVEL", u64::from(snap.level)),
            ("LINES", u64::from(snap.lines)),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u64(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.hold {
            Some(kind) => {
                let style = CellStyle {
                    fg: piece_color(kind),
                    dim: snap.hold_used,
                    ..value
                };
                fb.put_str(panel_x, y, kind.as_str(), style);
            }
            None => fb.put_str(panel_x, y, "-", dim),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in snap.next_queue {
            if y >= viewport.height {
                break;
            }
            let style = CellStyle {
                fg: piece_color(kind),
                ..value
            };
            fb.put_str(panel_x, y, kind.as_str(), style);
            y = y.saturating_add(1);
        }
    }

    fn draw_title(&self, fb: &mut FrameBuffer, frame: Frame, hud: &Hud) {
        let title = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: WELL_BG,
            bold: true,
            dim: false,
        };
        let hint = CellStyle {
            fg: Rgb::new(180, 180, 190),
            bg: WELL_BG,
            bold: false,
            dim: false,
        };
        let mid = frame.y + frame.h / 2;
        fb.put_str_centered(frame.x, frame.w, mid.saturating_sub(2), "BLOCKFALL", title);
        fb.put_str_centered(frame.x, frame.w, mid, "ENTER start", hint);
        fb.put_str_centered(frame.x, frame.w, mid + 1, "Q quit", hint);
        if hud.best_score > 0 {
            fb.put_str_centered(frame.x, frame.w, mid + 3, "BEST", hint);
            let digits = decimal_width(hud.best_score);
            let x = frame.x + frame.w.saturating_sub(digits) / 2;
            fb.put_u64(x, mid + 4, hud.best_score, hint);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let top = (frame.y + frame.h / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, text) in lines.iter().enumerate() {
            fb.put_str_centered(frame.x, frame.w, top + i as u16, text, style);
        }
    }
}

fn decimal_width(mut n: u64) -> u16 {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

//! GameView: maps the engine's grid and piece into a terminal framebuffer.
//!
//! This module is pure (no I/O) and unit-tested.

use crate::core::{ActivePiece, Grid};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellId, GameStatus, EMPTY};

const WELL_BG: Rgb = Rgb::new(0, 0, 0);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Color of a grid cell id (`None` for empty or unknown ids).
pub fn cell_color(id: CellId) -> Option<Rgb> {
    match id {
        1 => Some(Rgb::new(255, 0, 0)),     // red
        2 => Some(Rgb::new(0, 0, 255)),     // blue
        3 => Some(Rgb::new(238, 130, 238)), // violet
        4 => Some(Rgb::new(0, 128, 0)),     // green
        5 => Some(Rgb::new(128, 0, 128)),   // purple
        6 => Some(Rgb::new(255, 165, 0)),   // orange
        7 => Some(Rgb::new(255, 192, 203)), // pink
        _ => None,
    }
}

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

/// Everything drawn in one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub grid: &'a Grid,
    pub active: Option<&'a ActivePiece>,
    pub score: u32,
    pub lines: u32,
    pub status: GameStatus,
}

pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps cells roughly square in most fonts
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render `scene` into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into(&self, scene: &Scene<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default());

        let grid = scene.grid;
        let well_w = grid.width() as u16 * self.cell_w;
        let well_h = grid.height() as u16;
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle::new(Rgb::new(60, 60, 60), WELL_BG);
        fb.fill_rect(start_x + 1, start_y + 1, well_w, well_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        for (y, row) in grid.rows().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                if id != EMPTY {
                    self.draw_cell(fb, start_x, start_y, x as u16, y as u16, id);
                }
            }
        }

        if let Some(active) = scene.active {
            for (x, y, id) in active.cells() {
                if x >= 0 && x < grid.width() as i16 && y >= 0 && y < grid.height() as i16 {
                    self.draw_cell(fb, start_x, start_y, x as u16, y as u16, id);
                }
            }
        }

        self.draw_panel(fb, scene, start_x + frame_w + 2, start_y);

        match scene.status {
            GameStatus::NotStarted => {
                self.draw_overlay(fb, start_x, start_y, frame_w, frame_h, &["PRESS ENTER"], None)
            }
            GameStatus::GameOver => self.draw_overlay(
                fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                &["GAME OVER", "SCORE", "ENTER: RESTART"],
                Some(scene.score),
            ),
            GameStatus::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, scene: &Scene<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::new(Rgb::new(200, 200, 200), WELL_BG);

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

    fn draw_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16, id: CellId) {
        let Some(fg) = cell_color(id) else {
            return;
        };
        let style = CellStyle::new(fg, WELL_BG);
        let px = start_x + 1 + x * self.cell_w;
        fb.fill_rect(px, start_y + 1 + y, self.cell_w, 1, '█', style);
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, scene: &Scene<'_>, x: u16, y: u16) {
        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.put_str(x, y, "SCORE", label);
        fb.put_u32(x, y + 1, scene.score, value);
        fb.put_str(x, y + 3, "LINES", label);
        fb.put_u32(x, y + 4, scene.lines, value);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        lines: &[&str],
        score: Option<u32>,
    ) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        let total = lines.len() as u16 + u16::from(score.is_some());
        let mut y = start_y + frame_h.saturating_sub(total) / 2;

        for (i, text) in lines.iter().enumerate() {
            let text_w = text.chars().count() as u16;
            fb.put_str(start_x + frame_w.saturating_sub(text_w) / 2, y, text, style);
            y += 1;

            // The final score goes right under its label
            if i == 1 {
                if let Some(score) = score {
                    let digits = decimal_width(score);
                    fb.put_u32(start_x + frame_w.saturating_sub(digits) / 2, y, score, style);
                    y += 1;
                }
            }
        }
    }
}

fn decimal_width(mut n: u32) -> u16 {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

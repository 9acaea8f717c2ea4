//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or [`invalidate`]) is a full
//! redraw; afterwards only the runs of cells that changed are written.
//!
//! [`invalidate`]: TerminalRenderer::invalidate

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Owns stdout and the frame currently on screen.
pub struct TerminalRenderer {
    out: io::Stdout,
    shown: Option<FrameBuffer>,
    pending: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            shown: None,
            pending: Vec::with_capacity(16 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen with the cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.emit(|buf| {
            buf.queue(terminal::EnterAlternateScreen)?
                .queue(cursor::Hide)?
                .queue(terminal::DisableLineWrap)?;
            Ok(())
        })
    }

    /// Undo [`enter`](Self::enter). Raw mode is left even if the flush fails.
    pub fn exit(&mut self) -> Result<()> {
        let flushed = self.emit(|buf| {
            buf.queue(ResetColor)?
                .queue(SetAttribute(Attribute::Reset))?
                .queue(terminal::EnableLineWrap)?
                .queue(cursor::Show)?
                .queue(terminal::LeaveAlternateScreen)?;
            Ok(())
        });
        terminal::disable_raw_mode()?;
        flushed
    }

    /// Next draw repaints every cell.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Draw `fb`, then hand back the previously shown frame through it.
    ///
    /// Callers keep reusing the same buffer, so steady-state frames do not
    /// allocate.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let previous = self
            .shown
            .take()
            .filter(|prev| prev.width() == fb.width() && prev.height() == fb.height());
        let recycled = self.emit(|buf| match previous {
            Some(prev) => {
                encode_diff_into(&prev, fb, buf)?;
                Ok(prev)
            }
            None => {
                encode_full_into(fb, buf)?;
                Ok(FrameBuffer::new(fb.width(), fb.height()))
            }
        })?;
        self.shown = Some(std::mem::replace(fb, recycled));
        Ok(())
    }

    /// Encode commands into the pending buffer and write them out in one go.
    fn emit<T>(&mut self, encode: impl FnOnce(&mut Vec<u8>) -> Result<T>) -> Result<T> {
        self.pending.clear();
        let value = encode(&mut self.pending)?;
        self.out.write_all(&self.pending)?;
        self.out.flush()?;
        Ok(value)
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = StylePen::new(out);
    for y in 0..fb.height() {
        pen.write_span(0, y, fb.row(y))?;
    }
    pen.finish()
}

/// Encode only the changed runs between two equally sized frames into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = StylePen::new(out);
    for y in 0..next.height() {
        let row = next.row(y);
        for (start, len) in changed_spans(prev.row(y), row) {
            pen.write_span(start as u16, y, &row[start..start + len])?;
        }
    }
    pen.finish()
}

/// Writes spans of cells, emitting color commands only when the style changes.
struct StylePen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> StylePen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn write_span(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(x, y))?;
        for cell in cells {
            if self.style != Some(cell.style) {
                self.switch_to(cell.style)?;
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn switch_to(&mut self, style: CellStyle) -> Result<()> {
        // Some terminals drop colors on an attribute reset.
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out
            .queue(SetColors(Colors::new(color(style.fg), color(style.bg))))?;
        if style.bold {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        self.style = Some(style);
        Ok(())
    }

    /// Leave the terminal in its default style if anything was written.
    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            self.out.queue(ResetColor)?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// `(start, len)` of every run of cells in `next` that differs from `prev`.
fn changed_spans<'a>(
    prev: &'a [Cell],
    next: &'a [Cell],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let differs = move |x: usize| prev.get(x) != next.get(x);
    let mut x = 0;
    std::iter::from_fn(move || {
        x += (x..next.len()).take_while(|&i| !differs(i)).count();
        if x >= next.len() {
            return None;
        }
        let start = x;
        x += (x..next.len()).take_while(|&i| differs(i)).count();
        Some((start, x - start))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_spans_coalesce_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        for x in 1..=3 {
            b.put_char(x, 0, 'X', style);
        }
        b.put_char(5, 1, 'Y', style);

        let top: Vec<_> = changed_spans(a.row(0), b.row(0)).collect();
        let bottom: Vec<_> = changed_spans(a.row(1), b.row(1)).collect();
        assert_eq!(top, vec![(1, 3)]);
        assert_eq!(bottom, vec![(5, 1)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn diff_writes_only_the_changed_glyphs() {
        let a = FrameBuffer::new(8, 1);
        let mut b = a.clone();
        b.put_str(2, 0, "ok", CellStyle::default());
        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("ok"));
        assert!(!text.contains("  "));
    }

    #[test]
    fn full_redraw_contains_every_glyph() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "abc", CellStyle::default().bold());
        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("abc"));
    }
}

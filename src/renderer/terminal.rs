//! Terminal presenter: flushes a framebuffer to the real terminal
//!
//! The first frame (and any frame after a resize) is a full redraw; later
//! frames only emit runs of cells that changed since the previous one.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use super::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    /// Key event types are reported, so auto-repeat arrives as `Repeat`
    key_types_reported: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            key_types_reported: false,
        }
    }

    /// Switch to raw mode on the alternate screen and set the window title
    ///
    /// Terminals that support keyboard enhancement are asked to report key
    /// event types, so a held key is not mistaken for repeated presses.
    pub fn enter(&mut self, title: &str) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.key_types_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        if self.key_types_reported {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.buf.queue(terminal::SetTitle(title))?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal to how `enter` found it
    pub fn exit(&mut self) -> io::Result<()> {
        self.buf.clear();
        if std::mem::take(&mut self.key_types_reported) {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()
    }

    /// Force the next draw to be a full redraw
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Present a framebuffer, swapping it into internal state
    ///
    /// Callers keep one `FrameBuffer` and pass it in every frame; after the call
    /// it holds the previous frame's contents and is ready to be repainted.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> io::Result<()> {
        self.buf.clear();
        match self.last.take() {
            Some(mut prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                self.flush_buf()?;
                std::mem::swap(&mut prev, fb);
                self.last = Some(prev);
            }
            _ => {
                encode_full_into(fb, &mut self.buf)?;
                self.flush_buf()?;
                let mut prev = FrameBuffer::new(fb.width(), fb.height());
                std::mem::swap(&mut prev, fb);
                self.last = Some(prev);
            }
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()
    }
}

/// Encode a full-frame redraw into `out`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the runs of cells that differ between `prev` and `next`
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut current_style: Option<CellStyle> = None;

    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> io::Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Horizontal runs `(x, y, len)` of cells that differ; every row when sizes differ
pub fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
    let mut runs = Vec::new();
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            runs.push((0, y, next.width()));
        }
        return runs;
    }

    for y in 0..next.height() {
        let mut x = 0;
        while x < next.width() {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < next.width() && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            runs.push((start, y, x - start));
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_frames_have_no_runs() {
        let a = FrameBuffer::new(10, 3);
        let b = FrameBuffer::new(10, 3);
        assert!(changed_runs(&a, &b).is_empty());
    }

    #[test]
    fn test_changed_runs_group_adjacent_cells() {
        let prev = FrameBuffer::new(10, 2);
        let mut next = FrameBuffer::new(10, 2);
        next.put_str(2, 0, "abc", Rgb::new(255, 255, 255), false);
        next.put_glyph(9, 1, 'z', Rgb::new(255, 255, 255), false);

        assert_eq!(changed_runs(&prev, &next), vec![(2, 0, 3), (9, 1, 1)]);
    }

    #[test]
    fn test_size_change_marks_every_row() {
        let prev = FrameBuffer::new(4, 2);
        let next = FrameBuffer::new(6, 3);
        assert_eq!(
            changed_runs(&prev, &next),
            vec![(0, 0, 6), (0, 1, 6), (0, 2, 6)]
        );
    }

    #[test]
    fn test_diff_encoding_is_smaller_than_full() {
        let prev = FrameBuffer::new(40, 10);
        let mut next = FrameBuffer::new(40, 10);
        next.put_glyph(5, 5, '@', Rgb::new(255, 0, 0), true);

        let mut full = Vec::new();
        encode_full_into(&next, &mut full).unwrap();
        let mut diff = Vec::new();
        encode_diff_into(&prev, &next, &mut diff).unwrap();

        assert!(!diff.is_empty());
        assert!(diff.len() < full.len());
        assert!(String::from_utf8_lossy(&diff).contains('@'));
    }
}

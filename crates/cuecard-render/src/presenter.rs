#![forbid(unsafe_code)]

//! Presenter: full-frame ANSI emission for a [`Canvas`].
//!
//! Every frame is drawn from scratch in two passes over the same screen
//! area, which is what lets the foreground layer "float" above the
//! background without a compositing step:
//!
//! 1. Clear the screen, home the cursor.
//! 2. Print every background cell, row by row, with a line break after each
//!    row except the last.
//! 3. Home the cursor again.
//! 4. Print every opaque foreground cell, row by row. Transparent cells
//!    print no glyph, so the background stays visible through them; a
//!    transparent run that is followed by an opaque cell on the same row is
//!    stepped over with cursor-forward so later glyphs keep their column.
//!
//! All output goes through one `BufWriter` and is flushed once per frame.
//!
//! # Usage
//!
//! ```
//! use cuecard_render::canvas::{Canvas, Layer};
//! use cuecard_render::presenter::Presenter;
//!
//! let mut canvas = Canvas::new(8, 2).unwrap();
//! canvas.write_text(Layer::Foreground, 0, 0, "hi");
//!
//! let mut presenter = Presenter::new(Vec::new());
//! presenter.present(&canvas).unwrap();
//! let bytes = presenter.get_ref().clone();
//! assert!(bytes.starts_with(b"\x1b[2J\x1b[H"));
//! ```

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::canvas::Canvas;

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

/// How rows are separated in the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`, for terminals in cooked mode (the tty adds the carriage return).
    #[default]
    Lf,
    /// `\r\n`, for terminals in raw mode.
    CrLf,
}

impl LineEnding {
    /// The bytes written between rows.
    #[inline]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }
}

/// Full-frame presenter. See the module docs for the frame layout.
pub struct Presenter<W: Write> {
    /// Buffered writer for efficient output.
    writer: BufWriter<W>,
    line_ending: LineEnding,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing LF-separated rows.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            line_ending: LineEnding::default(),
        }
    }

    /// Set the row separator.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Present one full frame of `canvas`.
    pub fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "present",
            width = canvas.width(),
            height = canvas.height()
        )
        .entered();

        ansi::clear_screen(&mut self.writer)?;
        ansi::cursor_home(&mut self.writer)?;

        let last = canvas.height().saturating_sub(1);
        for row in 0..canvas.height() {
            if let Some(cells) = canvas.background_row(row) {
                self.writer.write_all(cells)?;
            }
            if row != last {
                self.writer.write_all(self.line_ending.as_bytes())?;
            }
        }

        ansi::cursor_home(&mut self.writer)?;
        for row in 0..canvas.height() {
            if let Some(cells) = canvas.foreground_row(row) {
                self.emit_foreground_row(cells)?;
            }
            if row != last {
                self.writer.write_all(self.line_ending.as_bytes())?;
            }
        }

        self.writer.flush()
    }

    fn emit_foreground_row(&mut self, cells: &[Option<u8>]) -> io::Result<()> {
        let mut skipped: u16 = 0;
        for cell in cells {
            match cell {
                None => skipped = skipped.saturating_add(1),
                Some(byte) => {
                    ansi::cuf(&mut self.writer, skipped)?;
                    skipped = 0;
                    self.writer.write_all(&[*byte])?;
                }
            }
        }
        Ok(())
    }

    /// Clear the entire screen and home the cursor.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        ansi::clear_screen(&mut self.writer)?;
        ansi::cursor_home(&mut self.writer)?;
        self.writer.flush()
    }

    /// Write `text` without a line break.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }

    /// Write `text` followed by the configured line ending.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(self.line_ending.as_bytes())?;
        self.writer.flush()
    }

    /// Get a reference to the underlying writer.
    ///
    /// Every public write method flushes before returning, so the writer
    /// holds everything emitted so far.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Layer;

    fn present(canvas: &Canvas, line_ending: LineEnding) -> Vec<u8> {
        let mut presenter = Presenter::new(Vec::new()).with_line_ending(line_ending);
        presenter.present(canvas).unwrap();
        presenter.get_ref().clone()
    }

    #[test]
    fn frame_order_background_then_foreground() {
        let mut canvas = Canvas::new(3, 2).unwrap();
        canvas.write_text(Layer::Background, 0, 0, "abc");
        canvas.write_text(Layer::Foreground, 1, 0, "XYZ");

        let out = present(&canvas, LineEnding::Lf);
        assert_eq!(out, b"\x1b[2J\x1b[Habc\n   \x1b[H\nXYZ");
    }

    #[test]
    fn transparent_cells_print_nothing() {
        let canvas = Canvas::new(4, 1).unwrap();
        let out = present(&canvas, LineEnding::Lf);
        assert_eq!(out, b"\x1b[2J\x1b[H    \x1b[H");
    }

    #[test]
    fn interior_gap_is_stepped_over() {
        let mut canvas = Canvas::new(6, 1).unwrap();
        canvas.write_cell(Layer::Foreground, 0, 0, b'a');
        canvas.write_cell(Layer::Foreground, 0, 4, b'b');
        let out = present(&canvas, LineEnding::Lf);
        assert!(out.ends_with(b"\x1b[Ha\x1b[3Cb"));
    }

    #[test]
    fn crlf_between_rows_only() {
        let canvas = Canvas::new(1, 3).unwrap();
        let out = present(&canvas, LineEnding::CrLf);
        assert_eq!(out, b"\x1b[2J\x1b[H \r\n \r\n \x1b[H\r\n\r\n");
    }

    #[test]
    fn zero_height_frame_is_just_control_sequences() {
        let canvas = Canvas::new(5, 0).unwrap();
        let out = present(&canvas, LineEnding::Lf);
        assert_eq!(out, b"\x1b[2J\x1b[H\x1b[H");
    }

    #[test]
    fn each_frame_starts_from_a_cleared_screen() {
        let canvas = Canvas::new(2, 2).unwrap();
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&canvas).unwrap();
        presenter.present(&canvas).unwrap();
        let out = presenter.get_ref();
        assert_eq!(out.windows(4).filter(|w| *w == b"\x1b[2J").count(), 2);
    }

    #[test]
    fn write_line_uses_line_ending() {
        let mut presenter = Presenter::new(Vec::new()).with_line_ending(LineEnding::CrLf);
        presenter.write_line("ready?").unwrap();
        assert_eq!(presenter.get_ref(), b"ready?\r\n");
    }

    #[test]
    fn clear_screen_works() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.clear_screen().unwrap();
        assert_eq!(presenter.get_ref(), b"\x1b[2J\x1b[H");
    }
}

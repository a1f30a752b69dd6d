#![forbid(unsafe_code)]

//! Dual-layer character canvas.
//!
//! The `Canvas` is a fixed-size grid of single-byte cells split into two
//! layers:
//!
//! - **Foreground** (opaque layer): each cell is either a byte or
//!   transparent. Transparent cells let the background show through.
//! - **Background**: each cell always holds a byte; a cleared background is
//!   all spaces.
//!
//! One cell is one byte. There is no Unicode width handling and no colour.
//!
//! # Layout
//!
//! Both layers are stored in row-major order: `index = row * width + col`.
//!
//! # Invariants
//!
//! 1. `foreground.len() == background.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Every write outside `[0, height) x [0, width)` is a silent no-op
//!
//! # Example
//!
//! ```
//! use cuecard_render::canvas::{Canvas, Layer};
//!
//! let mut canvas = Canvas::new(20, 3).unwrap();
//! canvas.write_text(Layer::Background, 1, 0, "behind");
//! canvas.write_text(Layer::Foreground, 1, 0, "in");
//! assert_eq!(canvas.composite_row(1).unwrap(), b"inhind              ");
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::bounded_writer::{FORMAT_CEILING, format_bounded};
use crate::presenter::Presenter;

/// Which of the two canvas layers an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The opaque layer; cells may be transparent.
    Foreground,
    /// The layer behind; always a byte, space when cleared.
    Background,
}

/// Canvas construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The cell storage for a `width x height` grid could not be reserved.
    Allocation {
        /// Requested width in cells.
        width: u16,
        /// Requested height in cells.
        height: u16,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { width, height } => {
                write!(f, "failed to allocate a {width}x{height} canvas")
            }
        }
    }
}

impl std::error::Error for CanvasError {}

/// A two-layer grid of byte cells. See the module docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    foreground: Vec<Option<u8>>,
    background: Vec<u8>,
}

impl Canvas {
    /// Byte a cleared background cell holds.
    pub const BLANK: u8 = b' ';

    /// Create a canvas with a fully transparent foreground and an
    /// all-space background.
    ///
    /// A zero width or height is allowed; such a canvas ignores every write.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Allocation`] if the cell storage cannot be
    /// reserved.
    pub fn new(width: u16, height: u16) -> Result<Self, CanvasError> {
        let size = width as usize * height as usize;
        let alloc_err = || CanvasError::Allocation { width, height };

        let mut foreground = Vec::new();
        foreground.try_reserve_exact(size).map_err(|_| alloc_err())?;
        foreground.resize(size, None);

        let mut background = Vec::new();
        background.try_reserve_exact(size).map_err(|_| alloc_err())?;
        background.resize(size, Self::BLANK);

        Ok(Self {
            width,
            height,
            foreground,
            background,
        })
    }

    /// A 0x0 canvas. Never allocates, so it cannot fail.
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            foreground: Vec::new(),
            background: Vec::new(),
        }
    }

    /// Canvas width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Canvas height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells per layer.
    #[inline]
    pub fn len(&self) -> usize {
        self.background.len()
    }

    /// Whether the canvas has no cells (zero width or height).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.background.is_empty()
    }

    /// Convert (row, col) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row as usize * self.width as usize + col as usize)
        } else {
            None
        }
    }

    fn row_range(&self, row: u16) -> Option<std::ops::Range<usize>> {
        if row < self.height {
            let start = row as usize * self.width as usize;
            Some(start..start + self.width as usize)
        } else {
            None
        }
    }

    /// Set one cell in `layer`. Does nothing if (row, col) is out of bounds.
    ///
    /// This is the bounds-checked primitive every other write goes through.
    #[inline]
    pub fn write_cell(&mut self, layer: Layer, row: u16, col: u16, byte: u8) {
        let Some(idx) = self.index(row, col) else {
            return;
        };
        match layer {
            Layer::Foreground => self.foreground[idx] = Some(byte),
            Layer::Background => self.background[idx] = byte,
        }
    }

    /// Read one cell.
    ///
    /// Returns `None` when out of bounds, or for a transparent foreground
    /// cell.
    #[inline]
    pub fn cell(&self, layer: Layer, row: u16, col: u16) -> Option<u8> {
        let idx = self.index(row, col)?;
        match layer {
            Layer::Foreground => self.foreground[idx],
            Layer::Background => Some(self.background[idx]),
        }
    }

    /// Whether the foreground cell at (row, col) is transparent.
    ///
    /// Out-of-bounds coordinates count as transparent.
    #[inline]
    pub fn is_transparent(&self, row: u16, col: u16) -> bool {
        self.cell(Layer::Foreground, row, col).is_none()
    }

    /// Write `text` left to right from (row, col), one byte per cell.
    ///
    /// Bytes that would land past the right edge are dropped; there is no
    /// wraparound (see [`Canvas::write_wrapped`]). Returns how many bytes
    /// landed on the canvas.
    pub fn write_text(
        &mut self,
        layer: Layer,
        row: u16,
        col: u16,
        text: impl AsRef<[u8]>,
    ) -> usize {
        if row >= self.height {
            return 0;
        }
        let mut written = 0;
        for (offset, &byte) in text.as_ref().iter().enumerate() {
            let Some(c) = usize::from(col).checked_add(offset) else {
                break;
            };
            if c >= usize::from(self.width) {
                break;
            }
            self.write_cell(layer, row, c as u16, byte);
            written += 1;
        }
        written
    }

    /// Format `args` and write the result with [`Canvas::write_text`].
    ///
    /// The formatted text is capped at [`FORMAT_CEILING`] bytes; anything
    /// beyond that is dropped before it reaches the canvas.
    pub fn write_formatted(
        &mut self,
        layer: Layer,
        row: u16,
        col: u16,
        args: fmt::Arguments<'_>,
    ) -> usize {
        let (bytes, truncated) = format_bounded(args, FORMAT_CEILING);
        if truncated {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                row,
                col,
                "formatted canvas text hit the {FORMAT_CEILING} byte ceiling"
            );
        }
        self.write_text(layer, row, col, bytes)
    }

    /// Write `text` from (row, col), continuing at column 0 of the next row
    /// whenever the right edge is reached.
    ///
    /// Rows past the bottom edge are dropped. Returns the number of rows the
    /// text touched (0 for empty text or an out-of-range start).
    pub fn write_wrapped(
        &mut self,
        layer: Layer,
        row: u16,
        col: u16,
        text: impl AsRef<[u8]>,
    ) -> u16 {
        let text = text.as_ref();
        if text.is_empty() || row >= self.height || col >= self.width {
            return 0;
        }

        let mut rows = 0u16;
        let mut r = row;
        let mut rest = text;
        let mut start_col = col;
        while !rest.is_empty() && r < self.height {
            let room = usize::from(self.width - start_col);
            let (line, tail) = rest.split_at(room.min(rest.len()));
            self.write_text(layer, r, start_col, line);
            rows += 1;
            rest = tail;
            start_col = 0;
            r += 1;
        }
        rows
    }

    /// Reset a layer: foreground to fully transparent, background to spaces.
    pub fn clear(&mut self, layer: Layer) {
        match layer {
            Layer::Foreground => self.foreground.fill(None),
            Layer::Background => self.background.fill(Self::BLANK),
        }
    }

    /// Fill an entire row of `layer` with `byte`. No-op for an
    /// out-of-range row.
    pub fn fill_row(&mut self, layer: Layer, row: u16, byte: u8) {
        let Some(range) = self.row_range(row) else {
            return;
        };
        match layer {
            Layer::Foreground => self.foreground[range].fill(Some(byte)),
            Layer::Background => self.background[range].fill(byte),
        }
    }

    /// Fill a background row with spaces.
    ///
    /// The background is opaque from construction, so this only undoes
    /// earlier writes to that row.
    pub fn make_row_opaque(&mut self, row: u16) {
        self.fill_row(Layer::Background, row, Self::BLANK);
    }

    /// Background cells for one row.
    #[inline]
    pub fn background_row(&self, row: u16) -> Option<&[u8]> {
        self.row_range(row).map(|range| &self.background[range])
    }

    /// Foreground cells for one row (`None` = transparent).
    #[inline]
    pub fn foreground_row(&self, row: u16) -> Option<&[Option<u8>]> {
        self.row_range(row).map(|range| &self.foreground[range])
    }

    /// What one row looks like on screen: the foreground byte where the
    /// foreground is opaque, the background byte elsewhere.
    pub fn composite_row(&self, row: u16) -> Option<Vec<u8>> {
        let range = self.row_range(row)?;
        Some(
            self.foreground[range.clone()]
                .iter()
                .zip(&self.background[range])
                .map(|(fg, bg)| fg.unwrap_or(*bg))
                .collect(),
        )
    }

    /// Flush one frame to `out` with LF line endings.
    ///
    /// Shorthand for a one-shot [`Presenter`]; long-lived callers should
    /// keep their own presenter.
    pub fn flush<W: Write>(&self, out: W) -> io::Result<()> {
        Presenter::new(out).present(self)
    }
}

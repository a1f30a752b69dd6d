#![forbid(unsafe_code)]

//! Terminal model for presenter validation.
//!
//! A minimal terminal emulator that understands exactly the subset of bytes
//! the presenter and the round loop emit, so tests can assert on what the
//! user would see instead of on raw escape sequences.
//!
//! # Scope
//!
//! This is NOT a full VT emulator. It supports only:
//! - ED 2 (clear screen)
//! - CUP (home and absolute), CUF (cursor forward)
//! - Private modes (`CSI ? ...`) are accepted and ignored
//! - CR, LF (optionally LF as CR+LF, like a cooked tty)
//! - Printable bytes with autowrap and scroll at the bottom edge
//!
//! # Usage
//!
//! ```
//! use cuecard_render::terminal_model::TerminalModel;
//!
//! let mut model = TerminalModel::new(10, 2);
//! model.process(b"\x1b[2J\x1b[Hhello\n\x1b[2Cok");
//! assert_eq!(model.row_text(0), "hello     ");
//! assert_eq!(model.row_text(1), "  ok      ");
//! ```

/// Parser state for escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Ground,
    Escape,
    Csi,
}

/// A minimal byte-cell terminal. See the module docs.
#[derive(Debug, Clone)]
pub struct TerminalModel {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    cursor_row: usize,
    cursor_col: usize,
    lf_returns_carriage: bool,
    state: ParseState,
    params: Vec<u8>,
    clears: usize,
}

impl TerminalModel {
    /// Create a blank model that treats LF as CR+LF (cooked tty behavior).
    pub fn new(width: u16, height: u16) -> Self {
        let width = usize::from(width);
        let height = usize::from(height);
        Self {
            width,
            height,
            cells: vec![b' '; width * height],
            cursor_row: 0,
            cursor_col: 0,
            lf_returns_carriage: true,
            state: ParseState::Ground,
            params: Vec::new(),
            clears: 0,
        }
    }

    /// Model a raw-mode tty, where LF only moves down.
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.lf_returns_carriage = false;
        self
    }

    /// Feed bytes to the model.
    pub fn process(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            match self.state {
                ParseState::Ground => self.ground(byte),
                ParseState::Escape => {
                    if byte == b'[' {
                        self.params.clear();
                        self.state = ParseState::Csi;
                    } else {
                        self.state = ParseState::Ground;
                    }
                }
                ParseState::Csi => {
                    if (0x40..=0x7e).contains(&byte) {
                        self.dispatch_csi(byte);
                        self.state = ParseState::Ground;
                    } else {
                        self.params.push(byte);
                    }
                }
            }
        }
    }

    fn ground(&mut self, byte: u8) {
        match byte {
            0x1b => self.state = ParseState::Escape,
            b'\r' => self.cursor_col = 0,
            b'\n' => {
                if self.lf_returns_carriage {
                    self.cursor_col = 0;
                }
                self.line_feed();
            }
            0x20..=0x7e => self.print(byte),
            _ => {}
        }
    }

    fn print(&mut self, byte: u8) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        if self.cursor_col >= self.width {
            self.cursor_col = 0;
            self.line_feed();
        }
        let idx = self.cursor_row * self.width + self.cursor_col;
        self.cells[idx] = byte;
        self.cursor_col += 1;
    }

    fn line_feed(&mut self) {
        if self.cursor_row + 1 < self.height {
            self.cursor_row += 1;
        } else if self.height > 0 {
            self.cells.drain(..self.width);
            self.cells.extend(std::iter::repeat_n(b' ', self.width));
        }
    }

    fn numeric_params(&self) -> Vec<usize> {
        self.params
            .split(|&b| b == b';')
            .map(|p| {
                std::str::from_utf8(p)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0)
            })
            .collect()
    }

    fn dispatch_csi(&mut self, final_byte: u8) {
        if self.params.first() == Some(&b'?') {
            return;
        }
        let params = self.numeric_params();
        let first = params.first().copied().unwrap_or(0);
        match final_byte {
            b'J' if first == 2 => {
                self.cells.fill(b' ');
                self.clears += 1;
            }
            b'H' => {
                let row = first.max(1) - 1;
                let col = params.get(1).copied().unwrap_or(0).max(1) - 1;
                self.cursor_row = row.min(self.height.saturating_sub(1));
                self.cursor_col = col.min(self.width.saturating_sub(1));
            }
            b'C' => {
                let n = first.max(1);
                self.cursor_col = (self.cursor_col + n).min(self.width.saturating_sub(1));
            }
            _ => {}
        }
    }

    /// Cursor position as (row, col).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// How many times the screen was cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// The byte shown at (row, col), or `None` if out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// One row's bytes.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row_bytes(&self, row: usize) -> &[u8] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// One row as text (lossy for non-UTF-8 bytes).
    pub fn row_text(&self, row: usize) -> String {
        String::from_utf8_lossy(self.row_bytes(row)).into_owned()
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|row| self.row_text(row).contains(needle))
    }

    /// Assert that a row starts with `expected` (trailing cells ignored).
    #[track_caller]
    pub fn assert_row_starts_with(&self, row: usize, expected: &str) {
        let actual = self.row_text(row);
        assert!(
            actual.starts_with(expected),
            "row {row}: expected prefix {expected:?}, got {actual:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_home() {
        let mut model = TerminalModel::new(4, 2);
        model.process(b"abcd\x1b[2J\x1b[H");
        assert_eq!(model.row_text(0), "    ");
        assert_eq!(model.cursor(), (0, 0));
        assert_eq!(model.clears(), 1);
    }

    #[test]
    fn raw_mode_lf_keeps_column() {
        let mut model = TerminalModel::new(4, 2).raw();
        model.process(b"ab\ncd");
        assert_eq!(model.row_text(1), "  cd");
    }

    #[test]
    fn cup_is_one_indexed() {
        let mut model = TerminalModel::new(5, 5);
        model.process(b"\x1b[3;4Hx");
        assert_eq!(model.cell(2, 3), Some(b'x'));
    }

    #[test]
    fn autowrap_after_last_column() {
        let mut model = TerminalModel::new(3, 2);
        model.process(b"abcd");
        assert_eq!(model.row_text(0), "abc");
        assert_eq!(model.row_text(1), "d  ");
    }

    #[test]
    fn scrolls_at_bottom() {
        let mut model = TerminalModel::new(2, 2);
        model.process(b"aa\nbb\ncc");
        assert_eq!(model.row_text(0), "bb");
        assert_eq!(model.row_text(1), "cc");
    }

    #[test]
    fn private_modes_leave_the_screen_alone() {
        let mut model = TerminalModel::new(2, 2);
        model.process(b"a\x1b[?25lb");
        assert_eq!(model.row_text(0), "ab");
    }
}

#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions for the handful of control sequences a
//! frame needs. The presenter decides *when* to emit them.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ 2 J` | ED (Erase Display, whole screen) |
//! | CSI | `ESC [ H` | CUP home (row 1, column 1) |
//! | CSI | `ESC [ n C` | CUF (Cursor Forward) |

use std::io::{self, Write};

/// ED 2: erase the whole display.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// CUP with no parameters: cursor to the top-left cell.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Write ED 2 (clear screen). The cursor does not move.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CLEAR_SCREEN)
}

/// Write CUP home.
#[inline]
pub fn cursor_home<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

/// Move cursor forward (right): `CSI n C`
///
/// Emits nothing for `n == 0`.
pub fn cuf<W: Write>(w: &mut W, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    if n == 1 {
        w.write_all(b"\x1b[C")
    } else {
        write!(w, "\x1b[{n}C")
    }
}

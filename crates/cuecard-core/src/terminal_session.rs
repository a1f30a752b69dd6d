#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! This module provides RAII-based terminal lifecycle management that ensures
//! cleanup even on panic. It owns raw-mode entry/exit and tracks the state
//! changes it made.
//!
//! # Lifecycle Guarantees
//!
//! 1. **All terminal state changes are tracked** - cursor visibility has
//!    a corresponding flag; raw mode is always undone.
//!
//! 2. **Drop restores previous state** - When the [`TerminalSession`] is
//!    dropped, enabled modes are disabled in reverse order.
//!
//! 3. **Panic safety** - A panic hook performs best-effort cleanup before the
//!    previous hook runs, so the terminal is usable even with
//!    `panic = "abort"`.
//!
//! # Raw mode and line endings
//!
//! Raw mode turns off output post-processing, so a bare `\n` moves down
//! without returning the carriage. Everything written while a session is
//! alive must end lines with `\r\n`. The runtime's console sets its
//! presenter to CR+LF for that reason.
//!
//! # Cleanup Order
//!
//! 1. Show cursor (if hidden)
//! 2. Exit raw mode (always)
//! 3. Flush stdout
//!
//! # Usage
//!
//! ```no_run
//! use cuecard_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions { hide_cursor: true })?;
//! let (cols, rows) = session.size()?;
//! # let _ = (cols, rows);
//! // When `session` is dropped, terminal is restored
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crate::event::KeyEvent;

/// Terminal session configuration options.
///
/// All options default to `false`; raw mode is always entered.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Hide the text cursor while the session is alive (`CSI ? 25 l`).
    pub hide_cursor: bool,
}

/// A terminal session that manages raw mode and cleanup.
///
/// # Contract
///
/// - **Exclusive ownership**: Only one `TerminalSession` should exist at a time.
/// - **Raw mode entry**: Creating a session enters raw mode. Ctrl+C is then
///   delivered as a key event rather than SIGINT.
/// - **Cleanup guarantee**: When dropped, all enabled modes are disabled and
///   the terminal is restored to its previous state.
#[derive(Debug)]
pub struct TerminalSession {
    cursor_hidden: bool,
}

impl TerminalSession {
    /// Enter raw mode and optionally enable additional features.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            cursor_hidden: false,
        };

        if options.hide_cursor {
            crossterm::execute!(io::stdout(), crossterm::cursor::Hide)?;
            session.cursor_hidden = true;
        }

        Ok(session)
    }

    /// Get the current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` if an event is available, `Ok(false)` if timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event (blocking until available).
    ///
    /// Returns `Ok(None)` for anything that is not a key press.
    pub fn read_key(&self) -> io::Result<Option<KeyEvent>> {
        let event = crossterm::event::read()?;
        Ok(KeyEvent::from_crossterm(event))
    }

    /// Discard every event already queued by the terminal.
    ///
    /// Returns how many events were dropped.
    pub fn drain_events(&self) -> io::Result<usize> {
        let mut dropped = 0;
        while crossterm::event::poll(Duration::ZERO)? {
            let _ = crossterm::event::read()?;
            dropped += 1;
        }
        Ok(dropped)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        // Exit raw mode last
        let _ = crossterm::terminal::disable_raw_mode();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_keeps_the_cursor() {
        assert!(!SessionOptions::default().hide_cursor);
    }

    // Tests that actually enter raw mode would interfere with the test
    // runner's terminal, so they are left to manual runs of the binary.
}

#![forbid(unsafe_code)]

//! The console seam between the round loop and the terminal.
//!
//! The round loop and the countdown never touch the terminal directly. They
//! go through [`Console`], which hands out a frame [`Presenter`] for output
//! and key events for input, and through [`Pacer`], which owns the wait
//! between countdown ticks. [`TerminalConsole`] is the real implementation;
//! [`ScriptedConsole`](crate::scripted::ScriptedConsole) replays canned input
//! without sleeping.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use cuecard_core::event::KeyEvent;
use cuecard_core::interrupt::Interrupts;
use cuecard_core::terminal_session::TerminalSession;
use cuecard_render::presenter::{LineEnding, Presenter};

/// Waits out one countdown tick.
pub trait Pacer {
    /// Block for about `tick`, raising `interrupts` if the user asks to
    /// stop during the wait.
    fn pause(&mut self, tick: Duration, interrupts: &Interrupts) -> io::Result<()>;
}

/// Terminal input and output as the round loop sees them.
pub trait Console: Pacer {
    /// Where frames and prompt text go.
    type Out: io::Write;

    /// Current terminal size as (columns, rows).
    fn size(&mut self) -> io::Result<(u16, u16)>;

    /// Wait for the next key press.
    ///
    /// With `Some(timeout)`, returns `Ok(None)` once the timeout passes
    /// without a key. With `None`, blocks until a key arrives.
    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>>;

    /// Throw away input typed before the current prompt.
    fn drain_input(&mut self) -> io::Result<()>;

    /// The presenter for this console's output.
    fn out(&mut self) -> &mut Presenter<Self::Out>;
}

/// [`Console`] over a raw-mode [`TerminalSession`] and stdout.
pub struct TerminalConsole {
    session: TerminalSession,
    presenter: Presenter<Stdout>,
}

impl TerminalConsole {
    /// Wrap an open session. Output uses CR+LF since the session is raw.
    pub fn new(session: TerminalSession) -> Self {
        Self {
            session,
            presenter: Presenter::new(io::stdout()).with_line_ending(LineEnding::CrLf),
        }
    }
}

impl Pacer for TerminalConsole {
    fn pause(&mut self, tick: Duration, interrupts: &Interrupts) -> io::Result<()> {
        let deadline = Instant::now() + tick;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Ok(());
            }
            if let Some(key) = self.next_key(Some(left))?
                && key.is_interrupt()
            {
                interrupts.raise();
                return Ok(());
            }
        }
    }
}

impl Console for TerminalConsole {
    type Out = Stdout;

    fn size(&mut self) -> io::Result<(u16, u16)> {
        self.session.size()
    }

    fn next_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(deadline) = deadline {
                let left = deadline.saturating_duration_since(Instant::now());
                if !self.session.poll_event(left)? {
                    return Ok(None);
                }
            }
            if let Some(key) = self.session.read_key()? {
                return Ok(Some(key));
            }
        }
    }

    fn drain_input(&mut self) -> io::Result<()> {
        let dropped = self.session.drain_events()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(dropped, "discarded pending input");
        #[cfg(not(feature = "tracing"))]
        let _ = dropped;
        Ok(())
    }

    fn out(&mut self) -> &mut Presenter<Stdout> {
        &mut self.presenter
    }
}

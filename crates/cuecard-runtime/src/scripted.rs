#![forbid(unsafe_code)]

//! Deterministic console for testing.
//!
//! `ScriptedConsole` plays back a fixed list of input steps, records every
//! byte of output, and never sleeps: a countdown tick only bumps a counter.
//! The round loop and the countdown run against it exactly as they would
//! against a terminal.
//!
//! # Example
//!
//! ```
//! use cuecard_core::event::{KeyCode, KeyEvent};
//! use cuecard_runtime::console::Console;
//! use cuecard_runtime::scripted::{ScriptStep, ScriptedConsole};
//!
//! let mut console = ScriptedConsole::new(40, 12)
//!     .with_script([ScriptStep::Key(KeyEvent::new(KeyCode::Enter))]);
//! let key = console.next_key(None).unwrap().unwrap();
//! assert!(key.is_enter());
//! ```

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use cuecard_core::event::{KeyCode, KeyEvent};
use cuecard_core::interrupt::Interrupts;
use cuecard_render::presenter::{LineEnding, Presenter};
use cuecard_render::terminal_model::TerminalModel;

use crate::console::{Console, Pacer};

/// One scripted input step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// A key typed while the program is waiting.
    Key(KeyEvent),
    /// A key typed ahead of the prompt; `drain_input` discards it.
    Stale(KeyEvent),
    /// A wait that times out with no key.
    Timeout,
    /// The terminal changes size.
    Resize(u16, u16),
    /// An interrupt arrives (as a signal would) while waiting for a key.
    Interrupt,
}

impl ScriptStep {
    /// Shorthand for a plain character key.
    pub fn char(c: char) -> Self {
        Self::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    /// Shorthand for the Enter key.
    pub fn enter() -> Self {
        Self::Key(KeyEvent::new(KeyCode::Enter))
    }
}

/// A console driven by a script. See the module docs.
pub struct ScriptedConsole {
    size: (u16, u16),
    script: VecDeque<ScriptStep>,
    presenter: Presenter<Vec<u8>>,
    interrupts: Option<std::sync::Arc<Interrupts>>,
    interrupt_at_tick: Option<u64>,
    ticks: u64,
    drains: usize,
}

impl ScriptedConsole {
    /// An empty script on a `width x height` terminal.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            script: VecDeque::new(),
            presenter: Presenter::new(Vec::new()).with_line_ending(LineEnding::CrLf),
            interrupts: None,
            interrupt_at_tick: None,
            ticks: 0,
            drains: 0,
        }
    }

    /// Append steps to the script.
    #[must_use]
    pub fn with_script(mut self, steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        self.script.extend(steps);
        self
    }

    /// Flag that [`ScriptStep::Interrupt`] raises.
    #[must_use]
    pub fn with_interrupts(mut self, interrupts: std::sync::Arc<Interrupts>) -> Self {
        self.interrupts = Some(interrupts);
        self
    }

    /// Raise the interrupt flag during the `tick`-th countdown pause
    /// (1-based, counted over the console's lifetime).
    #[must_use]
    pub fn interrupt_at_tick(mut self, tick: u64) -> Self {
        self.interrupt_at_tick = Some(tick);
        self
    }

    /// Countdown ticks waited so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// How many times input was drained.
    pub fn drains(&self) -> usize {
        self.drains
    }

    /// Steps not consumed yet.
    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }

    /// Every byte written so far.
    pub fn output(&self) -> &[u8] {
        self.presenter.get_ref()
    }

    /// Output as text (lossy).
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(self.output()).into_owned()
    }

    /// Replay the output into a raw-mode terminal of the current size.
    pub fn screen(&self) -> TerminalModel {
        let mut model = TerminalModel::new(self.size.0, self.size.1).raw();
        model.process(self.output());
        model
    }
}

impl Pacer for ScriptedConsole {
    fn pause(&mut self, _tick: Duration, interrupts: &Interrupts) -> io::Result<()> {
        self.ticks += 1;
        if self.interrupt_at_tick == Some(self.ticks) {
            interrupts.raise();
        }
        Ok(())
    }
}

impl Console for ScriptedConsole {
    type Out = Vec<u8>;

    fn size(&mut self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }

    fn next_key(&mut self, _timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        loop {
            match self.script.pop_front() {
                Some(ScriptStep::Key(key) | ScriptStep::Stale(key)) => return Ok(Some(key)),
                Some(ScriptStep::Timeout) => return Ok(None),
                Some(ScriptStep::Resize(width, height)) => self.size = (width, height),
                Some(ScriptStep::Interrupt) => {
                    if let Some(interrupts) = &self.interrupts {
                        interrupts.raise();
                    }
                    return Ok(None);
                }
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input script exhausted",
                    ));
                }
            }
        }
    }

    fn drain_input(&mut self) -> io::Result<()> {
        self.drains += 1;
        while matches!(self.script.front(), Some(ScriptStep::Stale(_))) {
            self.script.pop_front();
        }
        Ok(())
    }

    fn out(&mut self) -> &mut Presenter<Vec<u8>> {
        &mut self.presenter
    }
}

#![forbid(unsafe_code)]

//! Countdown driver.
//!
//! A countdown shows a message, the remaining time as `MM:SS`, and a help
//! line, all centered on the canvas background, and redraws them once per
//! second. Between redraws it only waits, one tick at a time, so a cancel
//! request is noticed within a tick.
//!
//! # State machine
//!
//! ```text
//!            draw D, D-1, ... (one redraw per second)
//!   Running ─────────────────────────────────────────► Stopped(Finished)
//!      │               after drawing 0
//!      │
//!      └── interrupt flag seen after a tick ─────────► Stopped(Cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. Without cancellation, a countdown from `D` redraws exactly `D + 1`
//!    times (`D` down to `0` inclusive).
//! 2. Exactly `tick_rate` ticks separate consecutive redraws.
//! 3. Every text position is clamped to the canvas, so narrow terminals
//!    lose text off the right edge instead of failing.
//! 4. A cancel consumes the interrupt flag.

use std::borrow::Cow;
use std::io;
use std::time::Duration;

use cuecard_core::interrupt::Interrupts;
use cuecard_render::canvas::{Canvas, Layer};

use crate::console::Console;

/// Checks per second used when nothing else is configured.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Help line shown under the timer.
pub const DEFAULT_HELP_TEXT: &str = "Press Ctrl + C to stop the timer";

/// Rows between the message and the timer.
const TIMER_ROW_OFFSET: u16 = 2;
/// Rows between the message and the help line.
const HELP_ROW_OFFSET: u16 = 5;

/// Countdown tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Interrupt checks per second. Must be non-zero.
    pub tick_rate: u32,
    /// Line shown three rows below the timer.
    pub help_text: Cow<'static, str>,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            help_text: Cow::Borrowed(DEFAULT_HELP_TEXT),
        }
    }
}

impl CountdownConfig {
    /// Set the tick rate. Zero is treated as one.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate.max(1);
        self
    }

    /// Set the help line.
    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<Cow<'static, str>>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Length of one tick.
    pub fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Reached `00:00`.
    Finished,
    /// The interrupt flag was raised while waiting.
    Cancelled,
}

/// Countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Still ticking; `remaining` is the next value to draw.
    Running {
        /// Seconds left to display.
        remaining: u32,
    },
    /// Done.
    Stopped(CountdownOutcome),
}

/// What a finished countdown did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownReport {
    /// How it ended.
    pub outcome: CountdownOutcome,
    /// Number of frames drawn.
    pub redraws: u32,
}

/// The countdown driver.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    config: CountdownConfig,
}

impl Countdown {
    /// Create a driver with `config`.
    pub fn new(config: CountdownConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// Count down from `seconds`, showing `message`.
    ///
    /// Draws on the canvas background and presents each frame through the
    /// console. The foreground is left alone, so anything drawn there stays
    /// on top.
    pub fn run<C: Console>(
        &self,
        console: &mut C,
        canvas: &mut Canvas,
        message: &str,
        seconds: u32,
        interrupts: &Interrupts,
    ) -> io::Result<CountdownReport> {
        #[cfg(feature = "tracing")]
        tracing::debug!(message, seconds, "countdown started");

        let tick = self.config.tick();
        let mut redraws = 0u32;
        let mut state = CountdownState::Running { remaining: seconds };

        let outcome = loop {
            let remaining = match state {
                CountdownState::Running { remaining } => remaining,
                CountdownState::Stopped(outcome) => break outcome,
            };

            self.draw(canvas, message, remaining);
            console.out().present(canvas)?;
            redraws += 1;

            if remaining == 0 {
                state = CountdownState::Stopped(CountdownOutcome::Finished);
                continue;
            }

            state = CountdownState::Running {
                remaining: remaining - 1,
            };
            for _ in 0..self.config.tick_rate {
                console.pause(tick, interrupts)?;
                if interrupts.take() {
                    state = CountdownState::Stopped(CountdownOutcome::Cancelled);
                    break;
                }
            }
        };

        #[cfg(feature = "tracing")]
        {
            match outcome {
                CountdownOutcome::Finished => tracing::debug!(redraws, "countdown finished"),
                CountdownOutcome::Cancelled => tracing::info!(redraws, "countdown cancelled"),
            }
        }

        Ok(CountdownReport { outcome, redraws })
    }

    /// Draw one countdown frame onto the canvas background.
    pub fn draw(&self, canvas: &mut Canvas, message: &str, remaining: u32) {
        canvas.clear(Layer::Background);

        let center_row = canvas.height() / 2;
        canvas.write_text(
            Layer::Background,
            center_row,
            centered_col(canvas.width(), message.len()),
            message,
        );

        let (minutes, secs) = (remaining / 60, remaining % 60);
        canvas.write_formatted(
            Layer::Background,
            center_row.saturating_add(TIMER_ROW_OFFSET),
            centered_col(canvas.width(), "00:00".len()),
            format_args!("{minutes:02}:{secs:02}"),
        );

        canvas.write_text(
            Layer::Background,
            center_row.saturating_add(HELP_ROW_OFFSET),
            centered_col(canvas.width(), self.config.help_text.len()),
            self.config.help_text.as_bytes(),
        );
    }
}

/// Column that centers `len` cells on a `width`-wide row, or 0 when it
/// does not fit.
pub fn centered_col(width: u16, len: usize) -> u16 {
    let len = u16::try_from(len).unwrap_or(u16::MAX);
    width.saturating_sub(len) / 2
}

#![forbid(unsafe_code)]

//! The round loop.
//!
//! ```text
//! welcome banner (once)
//! loop:
//!     clear screen (except the first round)
//!     "Press ENTER when you are ready for a card."
//!     drain typed-ahead input, wait for Enter
//!         interrupt here ─► quit confirmation ─► y: shutdown hook, Outcome::Quit
//!                                             └► anything else: resume waiting
//!     poll terminal size, rebuild the canvas if it changed
//!     choose a card, draw the intro, present
//!     "Get ready..." countdown, then "GO!" countdown for the card
//! ```
//!
//! Cancelling a countdown ends that countdown only: cancelling "Get ready..."
//! skips straight to "GO!", cancelling "GO!" ends the round.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use cuecard_core::interrupt::Interrupts;
use cuecard_deck::{CardList, CardPicker};
use cuecard_render::canvas::{Canvas, CanvasError};

use crate::console::Console;
use crate::countdown::{Countdown, CountdownConfig};
use crate::intro;

/// Printed once before the first round.
pub const WELCOME_TEXT: &str = "Welcome to The Game. Let's begin.";
/// Printed at the start of every round.
pub const READY_TEXT: &str = "Press ENTER when you are ready for a card.";
/// The quit confirmation question.
pub const QUIT_PROMPT: &str = "Are you sure you want to quit? (y/n) ";
/// Message of the warm-up countdown.
pub const GET_READY_MESSAGE: &str = "Get ready...";
/// Message of the card countdown.
pub const GO_MESSAGE: &str = "GO!";
/// Default length of the warm-up countdown in seconds.
pub const DEFAULT_READY_SECONDS: u32 = 4;

/// How often the ready prompt checks for a pending interrupt.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Round loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Countdown tuning, shared by both countdowns.
    pub countdown: CountdownConfig,
    /// Length of the "Get ready..." countdown.
    pub ready_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            countdown: CountdownConfig::default(),
            ready_seconds: DEFAULT_READY_SECONDS,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user confirmed the quit prompt.
    Quit,
}

/// Round loop failure.
#[derive(Debug)]
pub enum GameError {
    /// Terminal input or output failed.
    Io(io::Error),
    /// The canvas for the new terminal size could not be built.
    Canvas(CanvasError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Canvas(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Canvas(err) => Some(err),
        }
    }
}

impl From<io::Error> for GameError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CanvasError> for GameError {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

/// The round loop over one deck.
pub struct Game<'a> {
    cards: &'a CardList,
    picker: CardPicker,
    countdown: Countdown,
    ready_seconds: u32,
    interrupts: Arc<Interrupts>,
    canvas: Canvas,
    rounds: u64,
}

impl<'a> Game<'a> {
    /// Set up a game. The canvas is built on the first round.
    pub fn new(
        cards: &'a CardList,
        picker: CardPicker,
        config: GameConfig,
        interrupts: Arc<Interrupts>,
    ) -> Self {
        Self {
            cards,
            picker,
            countdown: Countdown::new(config.countdown),
            ready_seconds: config.ready_seconds,
            interrupts,
            canvas: Canvas::empty(),
            rounds: 0,
        }
    }

    /// Rounds started so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// The current canvas (zero-sized before the first round).
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Play rounds until the user quits.
    ///
    /// # Errors
    ///
    /// Fails on console I/O errors or when a canvas cannot be allocated.
    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<Outcome, GameError> {
        console.out().write_line(WELCOME_TEXT)?;
        console.out().write_line("")?;

        loop {
            if self.rounds > 0 {
                console.out().clear_screen()?;
            }
            console.out().write_line(READY_TEXT)?;
            console.drain_input()?;

            if let Some(outcome) = self.wait_for_enter(console)? {
                return Ok(outcome);
            }

            self.rounds += 1;
            self.play_round(console)?;
        }
    }

    fn play_round<C: Console>(&mut self, console: &mut C) -> Result<(), GameError> {
        let (width, height) = console.size()?;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas = Canvas::new(width, height)?;
            #[cfg(feature = "tracing")]
            tracing::info!(width, height, "canvas rebuilt");
        }

        let card = *self.picker.choose(self.cards);
        #[cfg(feature = "tracing")]
        tracing::info!(
            round = self.rounds,
            seconds = card.duration_seconds(),
            "card chosen"
        );

        intro::draw_intro(
            &mut self.canvas,
            self.cards.prompt(&card),
            card.duration_seconds(),
        );
        console.out().present(&self.canvas)?;

        self.countdown.run(
            console,
            &mut self.canvas,
            GET_READY_MESSAGE,
            self.ready_seconds,
            &self.interrupts,
        )?;
        self.countdown.run(
            console,
            &mut self.canvas,
            GO_MESSAGE,
            card.duration_seconds(),
            &self.interrupts,
        )?;
        Ok(())
    }

    /// Wait for Enter. Returns `Some` when the user quits instead.
    fn wait_for_enter<C: Console>(
        &mut self,
        console: &mut C,
    ) -> Result<Option<Outcome>, GameError> {
        loop {
            if self.interrupts.take() {
                if self.confirm_quit(console)? {
                    return Ok(Some(Outcome::Quit));
                }
                continue;
            }
            match console.next_key(Some(INPUT_POLL))? {
                Some(key) if key.is_interrupt() => self.interrupts.raise(),
                Some(key) if key.is_enter() => return Ok(None),
                _ => {}
            }
        }
    }

    /// Ask whether to quit. Returns `true` if the user answered `y`.
    ///
    /// Interrupts that arrive while the question is open are ignored.
    fn confirm_quit<C: Console>(&mut self, console: &mut C) -> Result<bool, GameError> {
        let Some(_gate) = self.interrupts.begin_confirmation() else {
            return Ok(false);
        };
        #[cfg(feature = "tracing")]
        tracing::info!("quit confirmation opened");

        console.out().clear_screen()?;
        console.out().write_text(QUIT_PROMPT)?;

        let answer = loop {
            match console.next_key(None)? {
                Some(key) if !key.is_interrupt() => break key,
                _ => {}
            }
        };
        self.interrupts.clear();

        if answer.is_char('y') {
            #[cfg(feature = "tracing")]
            tracing::info!("quit confirmed");
            self.interrupts.run_shutdown_hook();
            return Ok(true);
        }

        console.out().write_line("")?;
        console.out().write_line(READY_TEXT)?;
        Ok(false)
    }
}

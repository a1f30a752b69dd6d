#![forbid(unsafe_code)]

//! Runtime: the countdown driver, the card intro screen, and the round loop
//! that ties a deck, a canvas, and a console together.

pub mod console;
pub mod countdown;
pub mod game;
pub mod intro;
pub mod scripted;

pub use console::{Console, Pacer, TerminalConsole};
pub use countdown::{Countdown, CountdownConfig, CountdownOutcome, CountdownReport};
pub use game::{Game, GameConfig, GameError, Outcome};
pub use scripted::{ScriptStep, ScriptedConsole};

#![forbid(unsafe_code)]

//! cuecard: timed flashcard prompts in the terminal.
//!
//! The binary is a thin shell: [`cli`] turns arguments and environment into
//! [`cli::Opts`], and [`app`] wires the deck, the terminal, and the round
//! loop together.

pub mod app;
pub mod cli;

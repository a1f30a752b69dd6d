#![forbid(unsafe_code)]

//! Core: terminal lifecycle, key events, interrupt handling, and logging.

pub mod event;
pub mod interrupt;
pub mod logging;
pub mod terminal_session;

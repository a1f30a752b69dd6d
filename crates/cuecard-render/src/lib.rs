#![forbid(unsafe_code)]

//! Render kernel: a two-layer byte canvas and full-frame ANSI presentation.

pub mod ansi;
pub mod bounded_writer;
pub mod canvas;
pub mod presenter;
pub mod terminal_model;

pub use canvas::{Canvas, CanvasError, Layer};
pub use presenter::{LineEnding, Presenter};

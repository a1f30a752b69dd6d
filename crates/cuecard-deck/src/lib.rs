#![forbid(unsafe_code)]

//! Card decks: the card file parser, the parsed card list, and random
//! selection.
//!
//! # Card file format
//!
//! ```text
//! # comment lines start with '#' in the first column
//! Explain a hash map to a five year old ~ 90
//! Name three sorting algorithms ~ 30
//! ```
//!
//! Everything before the first `~` is the prompt, the integer after the last
//! `~` is the time limit in seconds. Lines without `~` are ignored.
//!
//! # Example
//!
//! ```
//! use cuecard_deck::{CardPicker, parse_bytes};
//!
//! let cards = parse_bytes(b"A ~ 5\nB ~ 3\n").unwrap();
//! let mut picker = CardPicker::with_seed(7);
//! let card = picker.choose(&cards);
//! assert!(card.duration_seconds() == 5 || card.duration_seconds() == 3);
//! ```

pub mod card;
pub mod error;
pub mod parser;
pub mod picker;

pub use card::{CardList, CardRecord, TextBlob};
pub use error::DeckError;
pub use parser::{load, parse, parse_bytes};
pub use picker::CardPicker;

#![forbid(unsafe_code)]

//! Canonical key types.
//!
//! The round loop only cares about a handful of inputs: Enter (ready for a
//! card), a typed answer to the quit prompt, and the interrupt chord
//! (Ctrl+C). Everything the terminal reports is folded into these types so
//! the runtime never touches crossterm directly.
//!
//! # Design Notes
//!
//! - In raw mode Ctrl+C arrives as a key event, not as SIGINT, so
//!   [`KeyEvent::is_interrupt`] is the keyboard half of the interrupt path.
//! - Release events are dropped during mapping; press and repeat both count.
//! - Resize, mouse, paste, and focus events map to `None`. Every frame reads
//!   the terminal size afresh, so a resize needs no event of its own.

use bitflags::bitflags;
use crossterm::event as cte;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// The interrupt chord (Ctrl+C).
    #[must_use]
    pub const fn interrupt() -> Self {
        Self::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL)
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Ctrl+C, with or without Shift.
    #[must_use]
    pub fn is_interrupt(&self) -> bool {
        self.ctrl() && (self.is_char('c') || self.is_char('C'))
    }

    /// Enter/Return.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.code == KeyCode::Enter
    }

    /// Convert a Crossterm event into a key event.
    ///
    /// Anything that is not a key press or repeat maps to `None`.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        let cte::Event::Key(key) = event else {
            return None;
        };
        if key.kind == cte::KeyEventKind::Release {
            return None;
        }
        let code = match key.code {
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            cte::KeyCode::Enter => KeyCode::Enter,
            _ => KeyCode::Other,
        };
        Some(Self {
            code,
            modifiers: Modifiers::from_crossterm(key.modifiers),
        })
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Any key the round loop does not distinguish.
    Other,
}

bitflags! {
    /// Modifier keys the round loop looks at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE = 0b0000;
        /// Control key.
        const CTRL = 0b0100;
    }
}

impl Modifiers {
    fn from_crossterm(modifiers: cte::KeyModifiers) -> Self {
        if modifiers.contains(cte::KeyModifiers::CONTROL) {
            Modifiers::CTRL
        } else {
            Modifiers::NONE
        }
    }
}

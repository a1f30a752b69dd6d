#![forbid(unsafe_code)]

//! Card deck errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Every way loading a card file can fail.
///
/// All of these are fatal for the program: the caller prints the message
/// and exits.
#[derive(Debug)]
pub enum DeckError {
    /// The card file could not be opened.
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Reading or rewinding the stream failed.
    Io(io::Error),
    /// Prompt storage could not be reserved.
    Allocation {
        /// Size of the failed reservation in bytes.
        bytes: usize,
    },
    /// A `~` line whose time limit is zero or not a number.
    InvalidDuration {
        /// 1-based line number in the file.
        line: usize,
        /// The prompt of the offending card.
        prompt: String,
    },
    /// A `~` line with nothing before the delimiter.
    EmptyPrompt {
        /// 1-based line number in the file.
        line: usize,
    },
    /// The file holds no card lines at all.
    NoValidCards,
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "could not open card file {}: {source}", path.display())
            }
            Self::Io(err) => write!(f, "failed to read card file: {err}"),
            Self::Allocation { bytes } => {
                write!(f, "failed to allocate {bytes} bytes of card storage")
            }
            Self::InvalidDuration { line, prompt } => write!(
                f,
                "invalid line {line} in card file: the time limit is invalid for the \
                 following prompt:\n\"{prompt}\""
            ),
            Self::EmptyPrompt { line } => write!(
                f,
                "invalid line {line} in card file: the prompt before '~' is empty"
            ),
            Self::NoValidCards => f.write_str("no valid cards found"),
        }
    }
}

impl std::error::Error for DeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DeckError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_duration_names_the_prompt() {
        let err = DeckError::InvalidDuration {
            line: 3,
            prompt: "X".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.ends_with("\"X\""));
    }

    #[test]
    fn io_errors_expose_source() {
        let err = DeckError::from(io::Error::other("boom"));
        assert!(err.source().is_some());
        assert!(DeckError::NoValidCards.source().is_none());
    }
}

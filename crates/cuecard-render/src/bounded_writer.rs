#![forbid(unsafe_code)]

//! Bounded scratch buffer for formatted text.
//!
//! Formatted canvas writes render into a [`BoundedWriter`] first. Output past
//! the ceiling is dropped and recorded, so a runaway format argument costs at
//! most [`FORMAT_CEILING`] bytes and never touches canvas memory it should
//! not.
//!
//! # Usage
//!
//! ```
//! use cuecard_render::bounded_writer::BoundedWriter;
//! use std::fmt::Write;
//!
//! let mut writer = BoundedWriter::new(4);
//! write!(writer, "{}:{:02}", 1, 5).unwrap();
//! assert_eq!(writer.as_bytes(), b"1:05");
//! assert!(!writer.truncated());
//!
//! write!(writer, "!").unwrap();
//! assert!(writer.truncated());
//! ```

use std::fmt;

/// Largest formatted write the canvas accepts, in bytes.
pub const FORMAT_CEILING: usize = 2048;

/// A `fmt::Write` sink that keeps at most `limit` bytes.
#[derive(Debug, Clone)]
pub struct BoundedWriter {
    buf: Vec<u8>,
    limit: usize,
    truncated: bool,
}

impl BoundedWriter {
    /// Create a writer that keeps at most `limit` bytes.
    #[inline]
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(limit.min(FORMAT_CEILING)),
            limit,
            truncated: false,
        }
    }

    /// Create a writer capped at [`FORMAT_CEILING`].
    #[inline]
    pub fn with_ceiling() -> Self {
        Self::new(FORMAT_CEILING)
    }

    /// Bytes kept so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Whether any output was dropped.
    #[inline]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Consume the writer and return the kept bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.buf.len();
        let bytes = s.as_bytes();
        if bytes.len() > room {
            self.buf.extend_from_slice(&bytes[..room]);
            self.truncated = true;
        } else {
            self.buf.extend_from_slice(bytes);
        }
        // Overflow is recorded in `truncated`, never reported as fmt::Error.
        Ok(())
    }
}

/// Render `args` into at most `limit` bytes.
///
/// Returns the kept bytes and whether anything was dropped.
pub fn format_bounded(args: fmt::Arguments<'_>, limit: usize) -> (Vec<u8>, bool) {
    let mut writer = BoundedWriter::new(limit);
    let _ = fmt::write(&mut writer, args);
    let truncated = writer.truncated();
    (writer.into_bytes(), truncated)
}

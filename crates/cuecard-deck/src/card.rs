#![forbid(unsafe_code)]

//! Parsed cards and their shared prompt storage.
//!
//! A [`CardList`] is an ordered list of [`CardRecord`]s plus one [`TextBlob`].
//! Records never own their prompt text; they hold an offset into the blob.
//!
//! # Invariants
//!
//! 1. A `CardList` is never empty. The parser rejects files without cards.
//! 2. Every record's `prompt_offset` is a multiple of the blob stride and
//!    lies inside the blob.
//! 3. Every prompt is non-empty and NUL-terminated inside its stride slot.
//! 4. Every `duration_seconds` is non-zero.

use std::borrow::Cow;

/// One card: a prompt (by offset) and its time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardRecord {
    prompt_offset: usize,
    duration_seconds: u32,
}

impl CardRecord {
    pub(crate) const fn new(prompt_offset: usize, duration_seconds: u32) -> Self {
        Self {
            prompt_offset,
            duration_seconds,
        }
    }

    /// Byte offset of the prompt inside the owning list's blob.
    #[inline]
    pub const fn prompt_offset(&self) -> usize {
        self.prompt_offset
    }

    /// Time limit in seconds (never zero).
    #[inline]
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

/// Fixed-stride prompt storage.
///
/// Slot `i` starts at `i * stride`; each prompt is NUL-terminated inside
/// its slot and the rest of the slot is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlob {
    bytes: Vec<u8>,
    stride: usize,
}

impl TextBlob {
    pub(crate) fn new(bytes: Vec<u8>, stride: usize) -> Self {
        Self { bytes, stride }
    }

    /// Distance in bytes between consecutive slots.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The raw storage, slot padding included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The NUL-terminated text starting at `offset`, without the NUL.
    ///
    /// Returns an empty slice for an offset past the end.
    pub fn text_at(&self, offset: usize) -> &[u8] {
        let Some(tail) = self.bytes.get(offset..) else {
            return &[];
        };
        let end = memchr::memchr(0, tail).unwrap_or(tail.len());
        &tail[..end]
    }
}

/// An ordered, immutable, non-empty list of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardList {
    records: Vec<CardRecord>,
    blob: TextBlob,
}

impl CardList {
    pub(crate) fn new(records: Vec<CardRecord>, blob: TextBlob) -> Self {
        debug_assert!(!records.is_empty());
        Self { records, blob }
    }

    /// Number of cards.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cards in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }

    /// Card `index`, in file order.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CardRecord> {
        self.records.get(index)
    }

    /// Raw prompt bytes of `card`.
    #[inline]
    pub fn prompt(&self, card: &CardRecord) -> &[u8] {
        self.blob.text_at(card.prompt_offset)
    }

    /// Prompt of `card` as text, replacing invalid UTF-8.
    pub fn prompt_lossy(&self, card: &CardRecord) -> Cow<'_, str> {
        String::from_utf8_lossy(self.prompt(card))
    }

    /// Distance in bytes between prompt slots.
    #[inline]
    pub fn stride(&self) -> usize {
        self.blob.stride()
    }

    /// The shared prompt storage.
    #[inline]
    pub fn blob(&self) -> &TextBlob {
        &self.blob
    }

    /// `(prompt, seconds)` pairs in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&[u8], u32)> + '_ {
        self.records
            .iter()
            .map(|card| (self.prompt(card), card.duration_seconds))
    }

    pub(crate) fn records(&self) -> &[CardRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a CardList {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

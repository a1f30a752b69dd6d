#![forbid(unsafe_code)]

//! Uniform random card selection.
//!
//! A `CardPicker` is seeded once (from the wall clock, or explicitly for
//! tests) and then advances an xorshift64 generator on every draw. It never
//! reseeds, so two picks in the same second do not repeat each other.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::card::{CardList, CardRecord};

/// Fallback state; xorshift must never hold zero.
const NONZERO_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

#[inline]
fn xorshift64(x: &mut u64) -> u64 {
    *x ^= *x << 13;
    *x ^= *x >> 7;
    *x ^= *x << 17;
    *x
}

#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 33)).wrapping_mul(0xff51_afd7_ed55_8ccd);
    z = (z ^ (z >> 33)).wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    z ^ (z >> 33)
}

/// Random card chooser.
#[derive(Debug, Clone)]
pub struct CardPicker {
    state: u64,
}

impl CardPicker {
    /// Seed from the current time.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        Self::with_seed(nanos ^ u64::from(std::process::id()))
    }

    /// Deterministic picker for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        let mixed = mix64(seed);
        let state = if mixed == 0 { NONZERO_STATE } else { mixed };
        Self { state }
    }

    /// Next raw draw.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        xorshift64(&mut self.state)
    }

    /// A uniformly distributed index in `0..len`, or `None` for `len == 0`.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        // Multiply-high reduction: the top 64 bits of draw * len.
        let wide = u128::from(self.next_u64()) * len as u128;
        Some((wide >> 64) as usize)
    }

    /// Pick one card uniformly at random.
    pub fn choose<'a>(&mut self, cards: &'a CardList) -> &'a CardRecord {
        let records = cards.records();
        let index = self.next_index(records.len()).unwrap_or(0);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, of = records.len(), "card chosen");
        &records[index]
    }
}

impl Default for CardPicker {
    fn default() -> Self {
        Self::new()
    }
}

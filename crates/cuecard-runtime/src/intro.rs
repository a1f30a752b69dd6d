#![forbid(unsafe_code)]

//! Card intro screen.
//!
//! ```text
//! row 0       ----------------------------------------
//! row 2       You will have 1 minute, 30 seconds to complete the following prompt:
//! row 4..     <prompt, wrapped at the right edge>
//! row 6 + n   ----------------------------------------   (n = extra prompt rows)
//! ```
//!
//! Everything goes on the foreground so the countdown, which draws on the
//! background, shows through the empty cells.

use cuecard_render::canvas::{Canvas, Layer};

const RULE: u8 = b'-';
const RULE_ROW: u16 = 0;
const SENTENCE_ROW: u16 = 2;
const PROMPT_ROW: u16 = 4;
const CLOSING_RULE_ROW: u16 = 6;

fn unit(count: u32, singular: &'static str, plural: &'static str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}

/// Human-readable time limit: `"1 minute, 5 seconds"`, `"2 minutes"`,
/// `"45 seconds"`. Zero units are left out.
pub fn duration_phrase(seconds: u32) -> String {
    let (minutes, secs) = (seconds / 60, seconds % 60);
    match (minutes, secs) {
        (0, s) => unit(s, "second", "seconds"),
        (m, 0) => unit(m, "minute", "minutes"),
        (m, s) => format!(
            "{}, {}",
            unit(m, "minute", "minutes"),
            unit(s, "second", "seconds")
        ),
    }
}

/// Draw the intro for a card onto a freshly cleared canvas.
///
/// Returns the row of the closing rule.
pub fn draw_intro(canvas: &mut Canvas, prompt: &[u8], seconds: u32) -> u16 {
    canvas.clear(Layer::Foreground);
    canvas.clear(Layer::Background);

    canvas.fill_row(Layer::Foreground, RULE_ROW, RULE);
    canvas.write_formatted(
        Layer::Foreground,
        SENTENCE_ROW,
        0,
        format_args!(
            "You will have {} to complete the following prompt:",
            duration_phrase(seconds)
        ),
    );

    let rows = canvas.write_wrapped(Layer::Foreground, PROMPT_ROW, 0, prompt);
    let closing = CLOSING_RULE_ROW.saturating_add(rows.saturating_sub(1));
    canvas.fill_row(Layer::Foreground, closing, RULE);
    closing
}

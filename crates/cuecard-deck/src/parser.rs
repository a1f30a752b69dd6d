#![forbid(unsafe_code)]

//! Two-pass card file parser.
//!
//! The parser works on raw bytes, never on pre-split lines:
//!
//! 1. **Sizing**: count the lines and find the longest one (comments
//!    included). This fixes the prompt slot stride (`longest + 1`) and the
//!    slot count before anything is allocated.
//! 2. **Rewind**, then **extraction**: a byte-at-a-time state machine copies
//!    each line into the next free slot and finalizes it at the newline (or
//!    at end of stream for an unterminated last line).
//!
//! Line rules, in priority order:
//!
//! - `#` in the first column: the whole line is skipped.
//! - No `~` on the line: skipped, and its slot is reused by the next line.
//! - Otherwise the prompt is the text before the first `~` minus one
//!   trailing space or tab, and the time limit is read from the text after
//!   the last `~` the way C `strtol` reads base 10. A zero limit (including
//!   text that is not a number) or an empty prompt is an error. A negative
//!   limit counts as its magnitude.
//!
//! After extraction the storage is compacted to the longest kept prompt and
//! truncated to the number of cards.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::card::{CardList, CardRecord, TextBlob};
use crate::error::DeckError;

const DELIMITER: u8 = b'~';
const COMMENT: u8 = b'#';
const SIZING_CHUNK: usize = 8 * 1024;

/// Result of the sizing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sizing {
    lines: usize,
    longest_line: usize,
}

/// Parse a card file from a seekable stream.
///
/// # Errors
///
/// See [`DeckError`]. I/O failures, a zero or unparsable time limit, an
/// empty prompt, and a file without any card all abort the parse.
pub fn parse<R: Read + Seek>(mut reader: R) -> Result<CardList, DeckError> {
    let sizing = measure(&mut reader)?;
    reader.rewind()?;

    let mut extractor = Extractor::new(sizing)?;
    for byte in BufReader::new(&mut reader).bytes() {
        extractor.feed(byte?)?;
    }
    let cards = extractor.finish()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        lines = sizing.lines,
        cards = cards.len(),
        stride = cards.stride(),
        "card file parsed"
    );
    Ok(cards)
}

/// Parse a card file held in memory.
pub fn parse_bytes(bytes: &[u8]) -> Result<CardList, DeckError> {
    parse(Cursor::new(bytes))
}

/// Open and parse the card file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<CardList, DeckError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DeckError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let cards = parse(file)?;

    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), cards = cards.len(), "deck loaded");
    Ok(cards)
}

fn measure<R: Read>(reader: &mut R) -> io::Result<Sizing> {
    let mut buf = [0u8; SIZING_CHUNK];
    let mut lines = 0usize;
    let mut longest_line = 0usize;
    let mut current = 0usize;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let chunk = &buf[..n];
        let mut start = 0;
        for newline in memchr::memchr_iter(b'\n', chunk) {
            current += newline - start;
            longest_line = longest_line.max(current);
            lines += 1;
            current = 0;
            start = newline + 1;
        }
        current += n - start;
    }

    // Unterminated last line.
    if current > 0 {
        lines += 1;
        longest_line = longest_line.max(current);
    }

    Ok(Sizing {
        lines,
        longest_line,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Text,
    Comment,
}

/// Pass 2 state machine.
struct Extractor {
    blob: Vec<u8>,
    stride: usize,
    slots: usize,
    records: Vec<CardRecord>,
    slot: usize,
    pos: usize,
    line: usize,
    state: LineState,
    longest_prompt: usize,
}

impl Extractor {
    fn new(sizing: Sizing) -> Result<Self, DeckError> {
        let stride = sizing.longest_line + 1;
        let blob = zeroed(sizing.lines.checked_mul(stride))?;

        let mut records = Vec::new();
        records
            .try_reserve_exact(sizing.lines)
            .map_err(|_| DeckError::Allocation {
                bytes: sizing
                    .lines
                    .saturating_mul(std::mem::size_of::<CardRecord>()),
            })?;

        Ok(Self {
            blob,
            stride,
            slots: sizing.lines,
            records,
            slot: 0,
            pos: 0,
            line: 1,
            state: LineState::Text,
            longest_prompt: 0,
        })
    }

    fn feed(&mut self, byte: u8) -> Result<(), DeckError> {
        match self.state {
            LineState::Comment => {
                if byte == b'\n' {
                    self.next_line();
                }
            }
            LineState::Text => {
                if byte == b'\n' {
                    self.finish_line()?;
                } else if byte == COMMENT && self.pos == 0 {
                    self.state = LineState::Comment;
                } else {
                    self.push(byte)?;
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, byte: u8) -> Result<(), DeckError> {
        // The last byte of every slot is reserved for the terminator.
        if self.slot >= self.slots || self.pos + 1 >= self.stride {
            return Err(changed_while_reading());
        }
        self.blob[self.slot * self.stride + self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    fn finish_line(&mut self) -> Result<(), DeckError> {
        let start = self.slot * self.stride;
        let line = &self.blob[start..start + self.pos];

        match memchr::memchr(DELIMITER, line) {
            None => {
                self.blob[start..start + self.pos].fill(0);
            }
            Some(first) => {
                // A NUL byte would end the stored prompt early.
                let raw = &line[..first];
                let raw = &raw[..memchr::memchr(0, raw).unwrap_or(raw.len())];
                let prompt_len = strip_one_blank(raw).len();
                if prompt_len == 0 {
                    return Err(DeckError::EmptyPrompt { line: self.line });
                }
                let last = memchr::memrchr(DELIMITER, line).unwrap_or(first);
                let seconds = parse_seconds(&line[last + 1..]);
                if seconds == 0 {
                    return Err(DeckError::InvalidDuration {
                        line: self.line,
                        prompt: String::from_utf8_lossy(&line[..prompt_len]).into_owned(),
                    });
                }

                self.blob[start + prompt_len..start + self.stride].fill(0);
                self.records.push(CardRecord::new(start, seconds));
                self.longest_prompt = self.longest_prompt.max(prompt_len);
                self.slot += 1;
            }
        }

        self.next_line();
        Ok(())
    }

    fn next_line(&mut self) {
        self.pos = 0;
        self.line += 1;
        self.state = LineState::Text;
    }

    fn finish(mut self) -> Result<CardList, DeckError> {
        if self.state == LineState::Text && self.pos > 0 {
            self.finish_line()?;
        }
        if self.records.is_empty() {
            return Err(DeckError::NoValidCards);
        }

        let stride = self.longest_prompt + 1;
        let mut blob = zeroed(self.records.len().checked_mul(stride))?;
        for (index, record) in self.records.iter_mut().enumerate() {
            let text = &self.blob[record.prompt_offset()..];
            let len = memchr::memchr(0, text).unwrap_or(text.len());
            let offset = index * stride;
            blob[offset..offset + len].copy_from_slice(&text[..len]);
            *record = CardRecord::new(offset, record.duration_seconds());
        }

        Ok(CardList::new(self.records, TextBlob::new(blob, stride)))
    }
}

fn zeroed(len: Option<usize>) -> Result<Vec<u8>, DeckError> {
    let len = len.ok_or(DeckError::Allocation { bytes: usize::MAX })?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| DeckError::Allocation { bytes: len })?;
    bytes.resize(len, 0);
    Ok(bytes)
}

fn changed_while_reading() -> DeckError {
    DeckError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "card file changed while it was being read",
    ))
}

fn strip_one_blank(text: &[u8]) -> &[u8] {
    match text {
        [head @ .., b' ' | b'\t'] => head,
        _ => text,
    }
}

/// Read a base-10 integer the way C `strtol` does and return its
/// magnitude, saturating at `u32::MAX`. Text without digits reads as 0.
pub(crate) fn parse_seconds(text: &[u8]) -> u32 {
    let mut rest = text;
    while let [b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c', tail @ ..] = rest {
        rest = tail;
    }
    if let [b'+' | b'-', tail @ ..] = rest {
        rest = tail;
    }
    let mut value = 0u32;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = u32::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(cards: &CardList) -> Vec<(String, u32)> {
        cards
            .iter()
            .map(|c| (cards.prompt_lossy(c).into_owned(), c.duration_seconds()))
            .collect()
    }

    #[test]
    fn sizing_counts_unterminated_last_line() {
        let sizing = measure(&mut Cursor::new(b"ab\n#long comment\nxyz")).unwrap();
        assert_eq!(
            sizing,
            Sizing {
                lines: 3,
                longest_line: 13
            }
        );
    }

    #[test]
    fn sizing_empty_stream() {
        let sizing = measure(&mut Cursor::new(b"")).unwrap();
        assert_eq!(sizing.lines, 0);
        assert_eq!(sizing.longest_line, 0);
    }

    #[test]
    fn mixed_file_keeps_cards_in_order() {
        let cards =
            parse_bytes(b"A ~ 5\nB ~ -3\n# comment\nC ~ 7\nno delimiter line\n").unwrap();
        assert_eq!(
            pairs(&cards),
            vec![
                ("A".to_owned(), 5),
                ("B".to_owned(), 3),
                ("C".to_owned(), 7)
            ]
        );
    }

    #[test]
    fn zero_duration_names_the_prompt() {
        match parse_bytes(b"X ~ 0") {
            Err(DeckError::InvalidDuration { line, prompt }) => {
                assert_eq!(line, 1);
                assert_eq!(prompt, "X");
            }
            other => panic!("expected InvalidDuration, got {other:?}"),
        }
    }

    #[test]
    fn garbage_duration_is_zero() {
        let err = parse_bytes(b"# header\n\nQ ~ soon\n").unwrap_err();
        assert!(matches!(err, DeckError::InvalidDuration { line: 3, .. }));
    }

    #[test]
    fn no_delimiter_anywhere() {
        let err = parse_bytes(b"just text\nmore text\n").unwrap_err();
        assert!(matches!(err, DeckError::NoValidCards));
        assert!(matches!(parse_bytes(b"").unwrap_err(), DeckError::NoValidCards));
        assert!(matches!(
            parse_bytes(b"# only ~ comments 5\n").unwrap_err(),
            DeckError::NoValidCards
        ));
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = parse_bytes(b"ok ~ 1\n~ 5\n").unwrap_err();
        assert!(matches!(err, DeckError::EmptyPrompt { line: 2 }));
        let err = parse_bytes(b"\t~ 5\n").unwrap_err();
        assert!(matches!(err, DeckError::EmptyPrompt { line: 1 }));
    }

    #[test]
    fn blank_prompt_survives_after_one_blank_is_stripped() {
        let cards = parse_bytes(b"  ~ 5\n").unwrap();
        assert_eq!(pairs(&cards), vec![(" ".to_owned(), 5)]);
    }

    #[test]
    fn prompt_ends_at_first_delimiter_duration_after_last() {
        let cards = parse_bytes(b"a~b ~ 12").unwrap();
        assert_eq!(pairs(&cards), vec![("a".to_owned(), 12)]);
    }

    #[test]
    fn no_space_around_delimiter() {
        let cards = parse_bytes(b"A~5\n").unwrap();
        assert_eq!(pairs(&cards), vec![("A".to_owned(), 5)]);
    }

    #[test]
    fn only_one_trailing_blank_is_stripped() {
        let cards = parse_bytes(b"  lead \t ~10\nA  ~ 5\nB\t~ 6\n").unwrap();
        assert_eq!(
            pairs(&cards),
            vec![
                ("  lead \t".to_owned(), 10),
                ("A ".to_owned(), 5),
                ("B".to_owned(), 6),
            ]
        );
    }

    #[test]
    fn hash_after_first_column_is_not_a_comment() {
        let cards = parse_bytes(b" #tag ~ 4\n").unwrap();
        assert_eq!(pairs(&cards), vec![(" #tag".to_owned(), 4)]);
    }

    #[test]
    fn crlf_line_endings() {
        let cards = parse_bytes(b"A ~ 5\r\nB ~ 6\r\n").unwrap();
        assert_eq!(
            pairs(&cards),
            vec![("A".to_owned(), 5), ("B".to_owned(), 6)]
        );
    }

    #[test]
    fn blob_is_compacted() {
        let cards = parse_bytes(b"# long comment line\nab ~ 1\nc ~ 2\n").unwrap();
        assert_eq!(cards.stride(), 3);
        assert_eq!(cards.blob().as_bytes(), b"ab\0c\0\0");
        let offsets: Vec<_> = cards.iter().map(|c| c.prompt_offset()).collect();
        assert_eq!(offsets, vec![0, 3]);
    }

    #[test]
    fn nul_byte_ends_the_prompt() {
        let cards = parse_bytes(b"ab\0cd ~ 3\n").unwrap();
        assert_eq!(pairs(&cards), vec![("ab".to_owned(), 3)]);
        assert!(matches!(
            parse_bytes(b"\0x ~ 3\n").unwrap_err(),
            DeckError::EmptyPrompt { line: 1 }
        ));
    }

    /// Serves `first` until rewound, then `second`.
    struct GrowingFile {
        second: &'static [u8],
        current: Cursor<&'static [u8]>,
    }

    impl Read for GrowingFile {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.current.read(buf)
        }
    }

    impl Seek for GrowingFile {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            self.current = Cursor::new(self.second);
            self.current.seek(pos)
        }
    }

    #[test]
    fn file_growing_between_passes_is_invalid_data() {
        let file = GrowingFile {
            second: b"A much longer prompt ~ 1\n",
            current: Cursor::new(&b"A ~ 1\n"[..]),
        };
        match parse(file) {
            Err(DeckError::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::InvalidData);
                assert!(err.to_string().contains("changed while it was being read"));
            }
            other => panic!("expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn extra_lines_after_sizing_are_invalid_data() {
        let file = GrowingFile {
            second: b"A ~ 1\nB ~ 2\n",
            current: Cursor::new(&b"A ~ 1\n"[..]),
        };
        assert!(matches!(
            parse(file),
            Err(DeckError::Io(err)) if err.kind() == io::ErrorKind::InvalidData
        ));
    }

    #[test]
    fn strtol_semantics() {
        assert_eq!(parse_seconds(b" 42"), 42);
        assert_eq!(parse_seconds(b"\t+7s"), 7);
        assert_eq!(parse_seconds(b"-15"), 15);
        assert_eq!(parse_seconds(b"12abc34"), 12);
        assert_eq!(parse_seconds(b"abc"), 0);
        assert_eq!(parse_seconds(b""), 0);
        assert_eq!(parse_seconds(b"- 5"), 0);
        assert_eq!(parse_seconds(b"99999999999999"), u32::MAX);
    }

    #[test]
    fn strip_blank() {
        assert_eq!(strip_one_blank(b"a \t "), b"a \t");
        assert_eq!(strip_one_blank(b"a\t"), b"a");
        assert_eq!(strip_one_blank(b" \t"), b" ");
        assert_eq!(strip_one_blank(b"a"), b"a");
        assert_eq!(strip_one_blank(b""), b"");
    }
}

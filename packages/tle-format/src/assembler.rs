//! Line-at-a-time grouping of name/line1/line2 triplets.
//!
//! The assembler owns no input; the caller feeds it lines from whatever
//! source it has (a `BufRead`, an async byte stream) and calls
//! [`TripletAssembler::finish`] once the input ends.

use std::io;

use crate::error::ParseError;
use crate::record::ElementSet;

/// Longest line accepted, not counting its line ending.
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// Per-line read cap for callers reading raw bytes: the longest accepted
/// line plus a CRLF. Anything that fills the cap without ending is rejected
/// by [`TripletAssembler::push_bytes`].
pub const LINE_READ_LIMIT: u64 = MAX_LINE_LEN as u64 + 2;

#[derive(Debug, Default)]
pub struct TripletAssembler {
    /// Lines of the group in progress, with their 1-based input line numbers.
    pending: Vec<(usize, String)>,
    lines_seen: usize,
    records_emitted: usize,
}

fn strip_line_ending(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

impl TripletAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one input line (with or without its trailing newline).
    ///
    /// Returns a record when the line completes a group. Every line belongs
    /// to a group, blank ones included, so stray blank lines at the end of a
    /// document show up as a truncated group.
    pub fn push_line(&mut self, raw: &str) -> Result<Option<ElementSet>, ParseError> {
        self.lines_seen += 1;

        let line = raw.trim_end_matches(['\n', '\r']);
        if line.len() > MAX_LINE_LEN {
            return Err(ParseError::LineTooLong {
                line: self.lines_seen,
                len: line.len(),
            });
        }

        // Name lines are free text; element lines keep their leading columns intact.
        let line = if self.pending.is_empty() {
            line.trim()
        } else {
            line.trim_end()
        };
        self.pending.push((self.lines_seen, line.to_string()));

        if self.pending.len() < 3 {
            return Ok(None);
        }

        let mut group = std::mem::take(&mut self.pending).into_iter();
        let (_, name) = group.next().unwrap_or_default();
        let (line1_no, line1) = group.next().unwrap_or_default();
        let (_, line2) = group.next().unwrap_or_default();

        let record = ElementSet::from_lines(&name, &line1, &line2).map_err(|source| {
            ParseError::Record {
                line: line1_no,
                source,
            }
        })?;

        self.records_emitted += 1;
        Ok(Some(record))
    }

    /// Feed one raw line as read from a byte source, at most
    /// [`LINE_READ_LIMIT`] bytes.
    ///
    /// The length is checked before decoding, so a read cut off by the cap
    /// is reported as [`ParseError::LineTooLong`] (with `len` the bytes read
    /// so far) rather than as bad UTF-8.
    pub fn push_bytes(&mut self, raw: &[u8]) -> Result<Option<ElementSet>, ParseError> {
        let content = strip_line_ending(raw);
        if content.len() > MAX_LINE_LEN {
            self.lines_seen += 1;
            return Err(ParseError::LineTooLong {
                line: self.lines_seen,
                len: content.len(),
            });
        }

        let line = std::str::from_utf8(content)
            .map_err(|e| ParseError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        self.push_line(line)
    }

    /// Signal end of input. A partial trailing group means the transfer was cut short.
    pub fn finish(self) -> Result<usize, ParseError> {
        if !self.pending.is_empty() {
            return Err(ParseError::TruncatedGroup {
                leftover: self.pending.len(),
            });
        }
        Ok(self.records_emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    const LINE1: &str = "1 25544U 98067A   24045.50000000  .00016717  00000-0  10270-3 0  9999";
    const LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579999999";

    #[test]
    fn emits_on_third_line() {
        let mut asm = TripletAssembler::new();
        assert!(asm.push_line("ISS (ZARYA)").unwrap().is_none());
        assert!(asm.push_line(LINE1).unwrap().is_none());
        let record = asm.push_line(LINE2).unwrap().unwrap();
        assert_eq!(record.catalog_number, 25544);
        assert_eq!(asm.finish().unwrap(), 1);
    }

    #[test]
    fn strips_line_endings_and_name_padding() {
        let mut asm = TripletAssembler::new();
        asm.push_line("ISS (ZARYA)             \r\n").unwrap();
        asm.push_line(&format!("{LINE1}\r\n")).unwrap();
        let record = asm.push_line(&format!("{LINE2}\r\n")).unwrap().unwrap();
        assert_eq!(record.object_name, "ISS (ZARYA)");
        assert_eq!(record.line1, LINE1);
        assert_eq!(record.line2, LINE2);
    }

    #[test]
    fn partial_group_fails_on_finish() {
        let mut asm = TripletAssembler::new();
        asm.push_line("ISS (ZARYA)").unwrap();
        asm.push_line(LINE1).unwrap();
        asm.push_line(LINE2).unwrap();
        asm.push_line("HUBBLE").unwrap();

        match asm.finish() {
            Err(ParseError::TruncatedGroup { leftover }) => assert_eq!(leftover, 1),
            other => panic!("expected truncated group, got {other:?}"),
        }
    }

    #[test]
    fn error_points_at_element_line() {
        let mut asm = TripletAssembler::new();
        asm.push_line("ISS (ZARYA)").unwrap();
        asm.push_line(LINE1).unwrap();
        asm.push_line(LINE2).unwrap();
        asm.push_line("SHORT").unwrap();
        asm.push_line("1 25544U").unwrap();
        let err = asm.push_line(LINE2).unwrap_err();

        assert_eq!(err.line(), Some(5));
        assert!(matches!(
            err,
            ParseError::Record {
                source: FieldError::LineTooShort { len: 8, .. },
                ..
            }
        ));
    }

    #[test]
    fn blank_lines_take_a_slot_in_the_group() {
        let mut asm = TripletAssembler::new();
        asm.push_line("ISS (ZARYA)").unwrap();
        asm.push_line(LINE1).unwrap();
        asm.push_line(LINE2).unwrap();
        assert!(asm.push_line("").unwrap().is_none());
        assert!(asm.push_line("   ").unwrap().is_none());

        match asm.finish() {
            Err(ParseError::TruncatedGroup { leftover }) => assert_eq!(leftover, 2),
            other => panic!("expected truncated group, got {other:?}"),
        }
    }

    #[test]
    fn blank_element_line_is_malformed() {
        let mut asm = TripletAssembler::new();
        asm.push_line("ISS (ZARYA)").unwrap();
        asm.push_line("").unwrap();
        let err = asm.push_line(LINE2).unwrap_err();

        assert!(matches!(
            err,
            ParseError::Record {
                line: 2,
                source: FieldError::LineTooShort { len: 0, .. },
            }
        ));
    }

    #[test]
    fn overlong_line_is_rejected() {
        let mut asm = TripletAssembler::new();
        let name = "X".repeat(MAX_LINE_LEN + 1);

        let err = asm.push_line(&name).unwrap_err();

        assert!(matches!(
            err,
            ParseError::LineTooLong { line: 1, len } if len == MAX_LINE_LEN + 1
        ));
    }

    #[test]
    fn line_at_the_limit_is_accepted() {
        let mut asm = TripletAssembler::new();
        let name = format!("{}\r\n", "X".repeat(MAX_LINE_LEN));

        asm.push_bytes(name.as_bytes()).unwrap();
        asm.push_bytes(format!("{LINE1}\n").as_bytes()).unwrap();
        let record = asm.push_bytes(LINE2.as_bytes()).unwrap().unwrap();

        assert_eq!(record.object_name.len(), MAX_LINE_LEN);
    }

    #[test]
    fn capped_read_with_split_character_is_too_long_not_bad_utf8() {
        let mut asm = TripletAssembler::new();
        // A read cap that lands inside a multibyte character
        let mut raw = "é".repeat(MAX_LINE_LEN / 2).into_bytes();
        raw.push(0xc3);
        raw.push(b'!');

        let err = asm.push_bytes(&raw).unwrap_err();

        assert!(matches!(err, ParseError::LineTooLong { line: 1, .. }));
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let mut asm = TripletAssembler::new();
        let err = asm.push_bytes(&[0xff, b'\n']).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}

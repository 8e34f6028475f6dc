//! Typed errors for TLE decoding.

use thiserror::Error;

/// A single field of an element line could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("element line is {len} characters, need at least {min}")]
    LineTooShort { len: usize, min: usize },

    #[error("element line contains non-ASCII characters in fixed columns")]
    NonAsciiColumns,

    #[error("catalog number is not numeric: {0:?}")]
    InvalidCatalogNumber(String),

    #[error("epoch year is not numeric: {0:?}")]
    InvalidEpochYear(String),

    #[error("epoch day-of-year is not numeric: {0:?}")]
    InvalidEpochDay(String),

    #[error("epoch is outside the representable range: {0:?}")]
    EpochOutOfRange(String),
}

/// Errors that abort decoding of a whole document.
///
/// The decoder does not recover after an error; the first failure ends the
/// stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A complete three-line group had a malformed element line.
    #[error("malformed element set at line {line}: {source}")]
    Record {
        /// 1-based input line number of the first element line.
        line: usize,
        #[source]
        source: FieldError,
    },

    /// A line ran past `MAX_LINE_LEN`. For capped reads `len` is the number
    /// of bytes read before giving up, not the full length.
    #[error("line {line} is too long ({len} bytes)")]
    LineTooLong { line: usize, len: usize },

    /// Input ended in the middle of a three-line group.
    #[error("incomplete element set at end of input ({leftover} leftover line(s))")]
    TruncatedGroup { leftover: usize },

    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The input line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Record { line, .. } | ParseError::LineTooLong { line, .. } => Some(*line),
            _ => None,
        }
    }
}

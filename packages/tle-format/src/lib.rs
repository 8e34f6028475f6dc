//! Streaming decoder for NORAD two-line element sets (TLE).
//!
//! The upstream catalog is a plain-text document of repeating three-line
//! groups: a free-text object name, then two fixed-column element lines.
//! This crate turns that text into [`ElementSet`] records without any I/O of
//! its own; callers hand it lines (see [`TripletAssembler`]) or a
//! [`std::io::BufRead`] (see [`ElementSetReader`]).
//!
//! # Example
//!
//! ```rust
//! use tle_format::parse_str;
//!
//! let doc = "ISS (ZARYA)\n\
//! 1 25544U 98067A   24045.50000000  .00016717  00000-0  10270-3 0  9999\n\
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50377579999999\n";
//!
//! let records = parse_str(doc).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].catalog_number, 25544);
//! ```

pub mod assembler;
pub mod epoch;
pub mod error;
pub mod reader;
pub mod record;

pub use assembler::{TripletAssembler, LINE_READ_LIMIT, MAX_LINE_LEN};
pub use epoch::decode_epoch;
pub use error::{FieldError, ParseError};
pub use reader::{parse_str, ElementSetReader};
pub use record::ElementSet;

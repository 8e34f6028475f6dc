//! Lazy decoding over a synchronous reader.

use std::io::{BufRead, Read};

use crate::assembler::{TripletAssembler, LINE_READ_LIMIT};
use crate::error::ParseError;
use crate::record::ElementSet;

/// Iterator of element sets read line by line from `R`.
///
/// Only one line is buffered at a time, and never more than
/// [`LINE_READ_LIMIT`] bytes of it. The iterator yields the first error it
/// hits (including a truncated trailing group) and then ends.
pub struct ElementSetReader<R> {
    reader: R,
    buf: Vec<u8>,
    assembler: Option<TripletAssembler>,
}

impl<R: BufRead> ElementSetReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            assembler: Some(TripletAssembler::new()),
        }
    }
}

impl<R: BufRead> Iterator for ElementSetReader<R> {
    type Item = Result<ElementSet, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let assembler = self.assembler.as_mut()?;

            self.buf.clear();
            match (&mut self.reader)
                .take(LINE_READ_LIMIT)
                .read_until(b'\n', &mut self.buf)
            {
                Ok(0) => {
                    let assembler = self.assembler.take()?;
                    return match assembler.finish() {
                        Ok(_) => None,
                        Err(e) => Some(Err(e)),
                    };
                }
                Ok(_) => match assembler.push_bytes(&self.buf) {
                    Ok(Some(record)) => return Some(Ok(record)),
                    Ok(None) => continue,
                    Err(e) => {
                        self.assembler = None;
                        return Some(Err(e));
                    }
                },
                Err(e) => {
                    self.assembler = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for ElementSetReader<R> {}

/// Decode a whole in-memory document.
pub fn parse_str(input: &str) -> Result<Vec<ElementSet>, ParseError> {
    ElementSetReader::new(input.as_bytes()).collect()
}

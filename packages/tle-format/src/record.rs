//! The decoded element-set record.

use chrono::{DateTime, Utc};

use crate::epoch::decode_epoch;
use crate::error::FieldError;

/// Line 1 must reach the end of the epoch field.
pub const MIN_LINE1_LEN: usize = 32;

const CATALOG_NUMBER_COLUMNS: std::ops::Range<usize> = 2..7;
const EPOCH_COLUMNS: std::ops::Range<usize> = 18..32;

/// One decoded orbital-elements observation.
///
/// `(catalog_number, epoch)` identifies the record; the element lines are
/// kept verbatim for downstream consumers that decode the remaining fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    pub catalog_number: i32,
    pub object_name: String,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
}

impl ElementSet {
    /// Decode one name line and its two element lines.
    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Self, FieldError> {
        if line1.len() < MIN_LINE1_LEN {
            return Err(FieldError::LineTooShort {
                len: line1.len(),
                min: MIN_LINE1_LEN,
            });
        }

        let catalog_field = line1
            .get(CATALOG_NUMBER_COLUMNS)
            .ok_or(FieldError::NonAsciiColumns)?
            .trim();
        let catalog_number = catalog_field
            .parse()
            .map_err(|_| FieldError::InvalidCatalogNumber(catalog_field.to_string()))?;

        let epoch_field = line1
            .get(EPOCH_COLUMNS)
            .ok_or(FieldError::NonAsciiColumns)?
            .trim();
        let epoch = decode_epoch(epoch_field)?;

        Ok(Self {
            catalog_number,
            object_name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch,
        })
    }
}

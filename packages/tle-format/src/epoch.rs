//! Epoch decoding.
//!
//! TLE epochs are written as `YYDDD.DDDDDDDD`: a two-digit year followed by
//! a fractional day of the year, where day `1.0` is midnight UTC on January 1.
//! Two-digit years below 57 belong to the 2000s, the rest to the 1900s; no
//! artificial satellite was tracked before 1957.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::error::FieldError;

/// Two-digit years strictly below this value are 20xx, the rest 19xx.
pub const YEAR_PIVOT: i32 = 57;

const NANOS_PER_DAY: f64 = 86_400.0 * 1_000_000_000.0;

/// Expand a two-digit TLE year into a full calendar year.
pub fn expand_year(two_digit: i32) -> i32 {
    if two_digit < YEAR_PIVOT {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Decode a trimmed epoch field such as `"24045.50000000"` into a UTC timestamp.
pub fn decode_epoch(epoch: &str) -> Result<DateTime<Utc>, FieldError> {
    let (year_field, day_field) = match (epoch.get(..2), epoch.get(2..)) {
        (Some(year), Some(day)) => (year, day),
        _ => return Err(FieldError::InvalidEpochYear(epoch.to_string())),
    };

    if !year_field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::InvalidEpochYear(year_field.to_string()));
    }
    let two_digit: i32 = year_field
        .parse()
        .map_err(|_| FieldError::InvalidEpochYear(year_field.to_string()))?;

    let day_of_year: f64 = day_field
        .parse()
        .map_err(|_| FieldError::InvalidEpochDay(day_field.to_string()))?;
    if !day_of_year.is_finite() {
        return Err(FieldError::InvalidEpochDay(day_field.to_string()));
    }

    let year = expand_year(two_digit);
    let whole_days = day_of_year.trunc();
    let fraction = day_of_year - whole_days;

    let out_of_range = || FieldError::EpochOutOfRange(epoch.to_string());

    let start_of_year = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(out_of_range)?
        .and_utc();
    let day_offset = TimeDelta::try_days(whole_days as i64 - 1).ok_or_else(out_of_range)?;
    let sub_day_offset = TimeDelta::nanoseconds((fraction * NANOS_PER_DAY) as i64);

    start_of_year
        .checked_add_signed(day_offset)
        .and_then(|ts| ts.checked_add_signed(sub_day_offset))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pivot_boundary() {
        assert_eq!(expand_year(56), 2056);
        assert_eq!(expand_year(57), 1957);
        assert_eq!(expand_year(0), 2000);
        assert_eq!(expand_year(99), 1999);
    }

    #[test]
    fn whole_day_is_midnight() {
        let ts = decode_epoch("24045.00000000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn half_day_is_noon() {
        let ts = decode_epoch("24045.50000000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 14, 12, 0, 0).unwrap());
    }

    #[test]
    fn day_one_is_new_year() {
        let ts = decode_epoch("57001.00000000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(1957, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn quarter_day_offset() {
        let ts = decode_epoch("99365.25000000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(1999, 12, 31, 6, 0, 0).unwrap());
    }

    #[test]
    fn rejects_non_numeric_year() {
        assert_eq!(
            decode_epoch("2x045.5").unwrap_err(),
            FieldError::InvalidEpochYear("2x".to_string())
        );
        assert!(matches!(
            decode_epoch("+4045.5"),
            Err(FieldError::InvalidEpochYear(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_day() {
        assert_eq!(
            decode_epoch("24abc").unwrap_err(),
            FieldError::InvalidEpochDay("abc".to_string())
        );
        assert!(matches!(decode_epoch("24"), Err(FieldError::InvalidEpochDay(_))));
        assert!(matches!(decode_epoch("24NaN"), Err(FieldError::InvalidEpochDay(_))));
    }

    #[test]
    fn rejects_short_field() {
        assert!(matches!(decode_epoch("2"), Err(FieldError::InvalidEpochYear(_))));
    }
}

//! Date-time parsing for range bounds and string-typed record timestamps.
//!
//! Accepted shapes (all naive, no offset):
//! - `2023-06-01T10:15:00` (the canonical request form)
//! - `2023-06-01T10:15:00.250` (fractional seconds are kept)
//! - `2023-06-01 10:15:00` (space separator)
//! - `2023-06-01` (midnight)
//!
//! Anything carrying an offset (`Z`, `+02:00`) is rejected: records and bounds
//! are compared as naive wall-clock values and mixing the two would silently
//! shift buckets.
//!
//! Years are limited to 1..=9999. Bucket labels are only fixed-width (and so
//! only sort chronologically) inside that window; chrono would otherwise
//! accept signed expanded years such as `+10000-01-01`.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AggregateError, Result};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years a bound may fall in.
pub const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

/// Parse an ISO-8601-like naive date-time.
pub fn parse_naive(s: &str) -> Result<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .filter(|dt| YEAR_RANGE.contains(&dt.year()))
        .ok_or_else(|| AggregateError::InvalidDateFormat {
            input: s.to_string(),
        })
}

//! Bucket width selector.
//!
//! A [`Granularity`] is parsed from the same lowercase words a request carries
//! (`"hour"`, `"day"`, `"month"`). Anything else is rejected up front with
//! [`AggregateError::UnsupportedGranularity`], so the bucket math never sees an
//! unknown width.
//!
//! ```
//! use series_aggregator::granularity::Granularity;
//!
//! let g: Granularity = "month".parse().unwrap();
//! assert_eq!(g, Granularity::Month);
//! assert_eq!(g.to_string(), "month");
//! assert!("week".parse::<Granularity>().is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AggregateError;

/// Calendar width of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Top of the hour to the next hour.
    Hour,
    /// Midnight to midnight.
    Day,
    /// 1st of the month to the 1st of the next month.
    Month,
}

impl Granularity {
    /// All supported widths, narrowest first.
    pub const ALL: [Granularity; 3] = [Granularity::Hour, Granularity::Day, Granularity::Month];

    /// The request word for this width.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AggregateError;

    // exact match: "Hour" or " day" are rejected like any other unknown word
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            _ => Err(AggregateError::UnsupportedGranularity(s.to_string())),
        }
    }
}

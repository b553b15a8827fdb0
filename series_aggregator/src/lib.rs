//! Bucketed time-series aggregation over BSON record dumps.
//!
//! Give [`aggregate_data`] a range, a granularity and a byte source; get back
//! one summed bucket per hour, day or month of the range, zero-filled and in
//! chronological order.
//!
//! ```
//! use series_aggregator::{aggregate_data, record::Amount};
//!
//! let series = aggregate_data(
//!     "2023-12-15T00:00:00",
//!     "2024-01-15T00:00:00",
//!     "month",
//!     std::io::empty(),
//! )
//! .unwrap();
//! assert_eq!(series.labels, ["2023-12-01T00:00:00", "2024-01-01T00:00:00"]);
//! assert_eq!(series.dataset, [Amount::ZERO, Amount::ZERO]);
//! ```

#![deny(missing_docs)]

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod error;
pub mod granularity;
pub mod loader;
pub mod record;
pub mod request;
pub mod timestamp;

pub use aggregate::{aggregate, aggregate_data, aggregate_file};
pub use error::{AggregateError, Result};
pub use granularity::Granularity;
pub use record::{Amount, DateRange, Record, TimeSeries};

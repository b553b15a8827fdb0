//! Failure taxonomy of one aggregation call.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a single aggregation call can fail.
///
/// None of these are retried; the caller gets the first failure and no partial
/// series.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A range bound could not be parsed as a date-time.
    #[error("Invalid date format: {input:?} (expected YYYY-MM-DDTHH:MM:SS)")]
    InvalidDateFormat {
        /// The rejected input, verbatim.
        input: String,
    },

    /// The grouping is not one of `hour`, `day` or `month`.
    #[error("Unsupported group_type: {0}")]
    UnsupportedGranularity(String),

    /// A document in the record source is missing or mistypes a required field.
    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord {
        /// Zero-based position of the document in the source.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The record source could not be opened or read.
    #[error("Record source unavailable{}: {source}", display_path(.path))]
    SourceUnavailable {
        /// Path of the source, when it is a file.
        path: Option<PathBuf>,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(": {}", p.display()))
        .unwrap_or_default()
}

/// Crate-wide result alias.
pub type Result<T, E = AggregateError> = std::result::Result<T, E>;

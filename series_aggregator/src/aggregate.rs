//! The aggregation pipeline: enumerate, accumulate, emit.
//!
//! 1. Every bucket the range walks through is inserted with a zero sum, so
//!    empty intervals still show up in the output.
//! 2. Each in-range record adds its value to the bucket derived from its *own*
//!    timestamp. The map stays open: a key the walk did not produce is created
//!    rather than dropped.
//! 3. Keys are sorted at emission. The fixed-width label makes string order
//!    chronological.
//!
//! Nothing here keeps state between calls; concurrent callers share nothing.

use std::{io::Read, path::Path};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    bucket::{derive_bucket, enumerate_labels},
    error::Result,
    granularity::Granularity,
    loader::{load_records, load_records_from_path},
    record::{Amount, DateRange, Record, TimeSeries},
    timestamp::parse_naive,
};

/// Bucket `records` over `range` at `granularity`.
///
/// An inverted range (`from > upto`) yields an empty series.
pub fn aggregate(range: DateRange, granularity: Granularity, records: &[Record]) -> TimeSeries {
    let mut buckets: IndexMap<String, Amount> = enumerate_labels(range.from, range.upto, granularity)
        .map(|label| (label, Amount::ZERO))
        .collect();
    let enumerated = buckets.len();

    let mut matched = 0usize;
    for record in records.iter().filter(|r| range.contains(r.dt)) {
        let (key, _) = derive_bucket(record.dt, granularity);
        *buckets.entry(key).or_default() += record.value;
        matched += 1;
    }

    buckets.sort_unstable_keys();
    debug!(
        %granularity,
        enumerated,
        buckets = buckets.len(),
        matched,
        total = records.len(),
        "aggregated records"
    );

    let (labels, dataset) = buckets.into_iter().unzip();
    TimeSeries { dataset, labels }
}

/// Validate the three request strings into a range and a granularity.
///
/// Both entry points run this before touching their source, so a bad request
/// never costs a read.
pub fn parse_request(
    dt_from: &str,
    dt_upto: &str,
    group_type: &str,
) -> Result<(DateRange, Granularity)> {
    let range = DateRange::new(parse_naive(dt_from)?, parse_naive(dt_upto)?);
    let granularity: Granularity = group_type.parse()?;
    Ok((range, granularity))
}

/// Parse the three request strings, load `source`, and aggregate.
///
/// Any failure aborts the call; no partial series is returned.
pub fn aggregate_data<R: Read>(
    dt_from: &str,
    dt_upto: &str,
    group_type: &str,
    source: R,
) -> Result<TimeSeries> {
    let (range, granularity) = parse_request(dt_from, dt_upto, group_type)?;
    let records = load_records(source)?;
    Ok(aggregate(range, granularity, &records))
}

/// [`aggregate_data`] over a BSON dump on disk.
///
/// Open and read failures report the path.
pub fn aggregate_file(
    dt_from: &str,
    dt_upto: &str,
    group_type: &str,
    path: impl AsRef<Path>,
) -> Result<TimeSeries> {
    let (range, granularity) = parse_request(dt_from, dt_upto, group_type)?;
    let records = load_records_from_path(path)?;
    Ok(aggregate(range, granularity, &records))
}

//! bucket.rs — calendar bucket mapping utilities
//!
//! - Timestamps are naive; whatever offset the source encoded is taken as-is.
//! - Hour/day: truncate the clock, then step by a fixed width.
//! - Month: truncate to the 1st, then step by a linear (year, month) index so
//!   December rolls into January of the next year.
//! - Successors are always computed from the *truncated* start, so walking
//!   forward from any instant inside a bucket lands on the same boundaries.
//!
//! The same [`truncate`] is used to enumerate a range and to classify records;
//! the two must never disagree on a key.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::granularity::Granularity;

/// Fixed-width label format of a bucket start. Lexicographic order of labels
/// equals chronological order for years 0000..=9999.
pub const LABEL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Round `ts` down to the start of its containing bucket.
pub fn truncate(ts: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let midnight = ts.date().and_time(NaiveTime::MIN);
    match granularity {
        Granularity::Hour => midnight + TimeDelta::hours(i64::from(ts.hour())),
        Granularity::Day => midnight,
        Granularity::Month => (ts.date() - Days::new(u64::from(ts.day0()))).and_time(NaiveTime::MIN),
    }
}

/// Start of the bucket following the one that begins at `start`.
///
/// `start` is expected to be a truncated boundary. Returns `None` only when
/// the successor falls outside chrono's representable calendar.
pub fn next_boundary(start: NaiveDateTime, granularity: Granularity) -> Option<NaiveDateTime> {
    match granularity {
        Granularity::Hour => start.checked_add_signed(TimeDelta::hours(1)),
        Granularity::Day => start.checked_add_days(Days::new(1)),
        Granularity::Month => next_month_start(start.date()).map(|d| d.and_time(NaiveTime::MIN)),
    }
}

/// Canonical label of a bucket start.
pub fn bucket_label(start: NaiveDateTime) -> String {
    start.format(LABEL_FORMAT).to_string()
}

/// Key of the bucket containing `ts` plus the start of the following bucket.
///
/// Pure and stateless: calling it again on the returned boundary yields that
/// boundary's own key and successor, every time.
pub fn derive_bucket(
    ts: NaiveDateTime,
    granularity: Granularity,
) -> (String, Option<NaiveDateTime>) {
    let start = truncate(ts, granularity);
    (bucket_label(start), next_boundary(start, granularity))
}

/// Labels of every bucket visited while walking from `from` to `upto`.
///
/// The cursor starts at `from` itself and then jumps to successive bucket
/// boundaries for as long as it stays `<= upto`. An inverted range yields
/// nothing.
pub fn enumerate_labels(
    from: NaiveDateTime,
    upto: NaiveDateTime,
    granularity: Granularity,
) -> impl Iterator<Item = String> {
    std::iter::successors(Some(from), move |cursor| {
        next_boundary(truncate(*cursor, granularity), granularity)
    })
    .take_while(move |cursor| *cursor <= upto)
    .map(move |cursor| derive_bucket(cursor, granularity).0)
}

// ----- month internals (calendar-aware) -----

fn next_month_start(first: NaiveDate) -> Option<NaiveDate> {
    // Linear month index, then split back into (year, month).
    let idx = i64::from(first.year()) * 12 + i64::from(first.month0()) + 1;
    let year = i32::try_from(idx.div_euclid(12)).ok()?;
    let month = idx.rem_euclid(12) as u32 + 1; // 1..=12
    NaiveDate::from_ymd_opt(year, month, 1)
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, LABEL_FORMAT).unwrap()
    }

    #[test]
    fn hour_key_and_boundary_come_from_truncated_value() {
        let (key, next) = derive_bucket(dt("2023-06-01T10:15:42"), Granularity::Hour);
        assert_eq!(key, "2023-06-01T10:00:00");
        assert_eq!(next, Some(dt("2023-06-01T11:00:00")));
    }

    #[test]
    fn hour_rolls_over_midnight() {
        let (key, next) = derive_bucket(dt("2023-12-31T23:59:59"), Granularity::Hour);
        assert_eq!(key, "2023-12-31T23:00:00");
        assert_eq!(next, Some(dt("2024-01-01T00:00:00")));
    }

    #[test]
    fn day_key_and_boundary() {
        let (key, next) = derive_bucket(dt("2024-02-28T17:30:00"), Granularity::Day);
        assert_eq!(key, "2024-02-28T00:00:00");
        assert_eq!(next, Some(dt("2024-02-29T00:00:00"))); // leap day
    }

    #[test]
    fn month_key_and_boundary() {
        let (key, next) = derive_bucket(dt("2024-02-29T12:00:00"), Granularity::Month);
        assert_eq!(key, "2024-02-01T00:00:00");
        assert_eq!(next, Some(dt("2024-03-01T00:00:00")));
    }

    #[test]
    fn month_rolls_over_year() {
        let (key, next) = derive_bucket(dt("2023-12-15T08:00:00"), Granularity::Month);
        assert_eq!(key, "2023-12-01T00:00:00");
        assert_eq!(next, Some(dt("2024-01-01T00:00:00")));
    }

    #[test]
    fn derive_is_idempotent_on_boundaries() {
        for g in Granularity::ALL {
            let start = truncate(dt("2023-07-19T13:45:10"), g);
            assert_eq!(truncate(start, g), start);

            let (k1, n1) = derive_bucket(start, g);
            let (k2, n2) = derive_bucket(start, g);
            assert_eq!((k1, n1), (k2, n2));

            // successor of the successor is stable too
            let n = n1.unwrap();
            assert_eq!(derive_bucket(n, g).0, bucket_label(n));
        }
    }

    #[test]
    fn enumeration_from_mid_bucket_aligns_to_boundaries() {
        let got: Vec<_> =
            enumerate_labels(dt("2023-06-01T10:30:00"), dt("2023-06-01T12:10:00"), Granularity::Hour)
                .collect();
        assert_eq!(
            got,
            vec![
                "2023-06-01T10:00:00",
                "2023-06-01T11:00:00",
                "2023-06-01T12:00:00"
            ]
        );
    }

    #[test]
    fn enumeration_of_inverted_range_is_empty() {
        let got: Vec<_> =
            enumerate_labels(dt("2023-06-02T00:00:00"), dt("2023-06-01T00:00:00"), Granularity::Day)
                .collect();
        assert!(got.is_empty());
    }

    #[test]
    fn enumeration_stops_at_calendar_end() {
        let got: Vec<_> = enumerate_labels(NaiveDateTime::MAX, NaiveDateTime::MAX, Granularity::Day)
            .collect();
        assert_eq!(got.len(), 1);
    }
}

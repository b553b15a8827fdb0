//! In-memory shapes of the aggregation input and output.

use std::{fmt, iter::Sum, ops::Add};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A numeric record value or bucket sum.
///
/// Integer arithmetic stays integer; as soon as one operand is real the result
/// is real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Whole number (BSON int32/int64).
    Int(i64),
    /// Floating point (BSON double).
    Real(f64),
}

impl Amount {
    /// Additive identity used for empty buckets.
    pub const ZERO: Amount = Amount::Int(0);

    /// Lossy view as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Amount::Int(i) => i as f64,
            Amount::Real(r) => r,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        match (self, rhs) {
            // overflow promotes to real
            (Amount::Int(a), Amount::Int(b)) => match a.checked_add(b) {
                Some(sum) => Amount::Int(sum),
                None => Amount::Real(a as f64 + b as f64),
            },
            (a, b) => Amount::Real(a.as_f64() + b.as_f64()),
        }
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<i64> for Amount {
    fn from(v: i64) -> Self {
        Amount::Int(v)
    }
}

impl From<i32> for Amount {
    fn from(v: i32) -> Self {
        Amount::Int(i64::from(v))
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Amount::Real(v)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Int(i) => write!(f, "{i}"),
            Amount::Real(r) => write!(f, "{r}"),
        }
    }
}

/// One timestamped value from the record source. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// When the value was recorded.
    pub dt: NaiveDateTime,
    /// The value itself.
    pub value: Amount,
}

impl Record {
    /// Create a new record.
    pub fn new(dt: NaiveDateTime, value: impl Into<Amount>) -> Self {
        Self {
            dt,
            value: value.into(),
        }
    }
}

/// Inclusive `[from, upto]` window. `from > upto` is allowed and empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First instant included.
    pub from: NaiveDateTime,
    /// Last instant included.
    pub upto: NaiveDateTime,
}

impl DateRange {
    /// Create a new range; no ordering is enforced.
    pub const fn new(from: NaiveDateTime, upto: NaiveDateTime) -> Self {
        Self { from, upto }
    }

    /// Whether the range contains no instant at all.
    pub fn is_empty(&self) -> bool {
        self.from > self.upto
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.from <= ts && ts <= self.upto
    }
}

/// Aggregation output: parallel sums and bucket labels, ascending by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Bucket sums, one per label.
    pub dataset: Vec<Amount>,
    /// Bucket start labels (`YYYY-MM-DDTHH:MM:SS`).
    pub labels: Vec<String>,
}

impl TimeSeries {
    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no bucket was produced (inverted range).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(label, sum)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.dataset.iter().copied())
    }

    /// Serialize as JSON indented by `indent` spaces.
    pub fn to_json_pretty(&self, indent: usize) -> serde_json::Result<String> {
        let pad = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_sums_stay_int() {
        let s: Amount = [5i64, 7, 3].into_iter().map(Amount::from).sum();
        assert_eq!(s, Amount::Int(15));
    }

    #[test]
    fn real_operand_promotes() {
        assert_eq!(Amount::Int(2) + Amount::Real(0.5), Amount::Real(2.5));
        assert_eq!(Amount::Real(0.5) + Amount::Int(2), Amount::Real(2.5));
    }

    #[test]
    fn int_overflow_promotes_to_real() {
        let s = Amount::Int(i64::MAX) + Amount::Int(1);
        assert!(matches!(s, Amount::Real(_)));
    }

    #[test]
    fn range_is_inclusive() {
        let a = NaiveDateTime::parse_from_str("2023-06-01T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let b = NaiveDateTime::parse_from_str("2023-06-02T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let r = DateRange::new(a, b);
        assert!(r.contains(a) && r.contains(b));
        assert!(!r.is_empty());
        assert!(DateRange::new(b, a).is_empty());
    }

    #[test]
    fn json_keeps_int_and_real_apart() {
        let ts = TimeSeries {
            dataset: vec![Amount::Int(12), Amount::Real(1.5)],
            labels: vec!["a".into(), "b".into()],
        };
        let v: serde_json::Value = serde_json::from_str(&ts.to_json_pretty(4).unwrap()).unwrap();
        assert_eq!(v["dataset"][0], serde_json::json!(12));
        assert_eq!(v["dataset"][1], serde_json::json!(1.5));
    }

    #[test]
    fn pretty_json_uses_requested_indent() {
        let ts = TimeSeries {
            dataset: vec![Amount::Int(1)],
            labels: vec!["2023-06-01T00:00:00".into()],
        };
        let text = ts.to_json_pretty(4).unwrap();
        assert!(text.contains("\n    \"dataset\": [\n        1\n    ]"));
    }
}

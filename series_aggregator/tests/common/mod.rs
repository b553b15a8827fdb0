#![allow(dead_code)]

use std::io::Write;

use bson::{Bson, Document, doc};
use chrono::NaiveDateTime;
use series_aggregator::timestamp::parse_naive;
use tempfile::NamedTempFile;

pub fn ts(s: &str) -> NaiveDateTime {
    parse_naive(s).expect("test timestamp")
}

pub fn payment(dt: &str, value: impl Into<Bson>) -> Document {
    doc! {
        "dt": bson::DateTime::from_chrono(ts(dt).and_utc()),
        "value": value.into(),
    }
}

/// Concatenate documents the way a collection dump stores them.
pub fn dump(docs: &[Document]) -> Vec<u8> {
    let mut out = Vec::new();
    for d in docs {
        d.to_writer(&mut out).expect("encode document");
    }
    out
}

/// Write `docs` to a temp file that lives as long as the returned handle.
pub fn dump_to_file(docs: &[Document]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(&dump(docs)).expect("write dump");
    f.flush().expect("flush dump");
    f
}

/// The three payments used across the scenario tests.
pub fn sample_payments() -> Vec<Document> {
    vec![
        payment("2023-06-01T10:15:00", 5_i32),
        payment("2023-06-01T11:05:00", 7_i32),
        payment("2023-06-02T00:00:00", 3_i32),
    ]
}

//! Record loading from a BSON dump.
//!
//! The source is a plain concatenation of BSON documents (what `mongodump`
//! writes for one collection). It is read once, fully, then decoded front to
//! back. Each document needs:
//! - `dt`: a BSON datetime (UTC milliseconds) or an ISO-8601 string
//! - `value`: an int32, int64 or double
//!
//! Other fields are ignored. The first bad document aborts the whole load.

use std::{
    fs::File,
    io::{Cursor, Read},
    path::Path,
};

use bson::{Bson, Document};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::{
    error::{AggregateError, Result},
    record::{Amount, Record},
    timestamp::parse_naive,
};

/// Field holding the record timestamp.
pub const DT_FIELD: &str = "dt";
/// Field holding the record value.
pub const VALUE_FIELD: &str = "value";

/// Read every record from `reader`, preserving source order.
pub fn load_records<R: Read>(mut reader: R) -> Result<Vec<Record>> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| AggregateError::SourceUnavailable { path: None, source })?;
    decode_records(&buf)
}

/// Open `path` and load every record in it.
pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let unavailable = |source: std::io::Error| AggregateError::SourceUnavailable {
        path: Some(path.to_path_buf()),
        source,
    };

    let mut buf = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut buf))
        .map_err(unavailable)?;
    debug!(path = %path.display(), bytes = buf.len(), "read record source");
    decode_records(&buf)
}

/// Decode concatenated BSON documents into records.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut cursor = Cursor::new(bytes);
    let mut records = Vec::new();

    while (cursor.position() as usize) < bytes.len() {
        let index = records.len();
        let doc = Document::from_reader(&mut cursor).map_err(|e| AggregateError::MalformedRecord {
            index,
            reason: format!("undecodable document: {e}"),
        })?;
        records.push(record_from_document(index, &doc)?);
    }

    debug!(count = records.len(), "decoded records");
    Ok(records)
}

/// Pull the two required fields out of one document.
pub fn record_from_document(index: usize, doc: &Document) -> Result<Record> {
    let malformed = |reason: String| AggregateError::MalformedRecord { index, reason };

    let dt = match doc.get(DT_FIELD) {
        Some(bson) => timestamp_of(bson).ok_or_else(|| {
            malformed(format!("field `{DT_FIELD}` is not a date-time: {bson}"))
        })?,
        None => return Err(malformed(format!("missing field `{DT_FIELD}`"))),
    };
    let value = match doc.get(VALUE_FIELD) {
        Some(bson) => amount_of(bson)
            .ok_or_else(|| malformed(format!("field `{VALUE_FIELD}` is not numeric: {bson}")))?,
        None => return Err(malformed(format!("missing field `{VALUE_FIELD}`"))),
    };

    Ok(Record { dt, value })
}

fn timestamp_of(bson: &Bson) -> Option<NaiveDateTime> {
    match bson {
        Bson::DateTime(dt) => Some(dt.to_chrono().naive_utc()),
        Bson::String(s) => parse_naive(s).ok(),
        _ => None,
    }
}

fn amount_of(bson: &Bson) -> Option<Amount> {
    match bson {
        Bson::Int32(i) => Some(Amount::from(*i)),
        Bson::Int64(i) => Some(Amount::from(*i)),
        Bson::Double(d) => Some(Amount::from(*d)),
        _ => None,
    }
}

//! Request/reply handling for message-style front ends.
//!
//! A front end hands over the raw text of one inbound message and gets back
//! the text to send. Requests are JSON objects:
//!
//! ```json
//! {"dt_from": "2022-09-01T00:00:00", "dt_upto": "2022-12-31T23:59:00", "group_type": "month"}
//! ```
//!
//! Failures never escape [`handle_message`]: they are rendered as
//! `Error: <reason>` so one bad request cannot take the process down.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{aggregate::aggregate_file, error::AggregateError, record::TimeSeries};

/// Command that asks for the greeting instead of an aggregation.
pub const START_COMMAND: &str = "/start";

/// Greeting sent in reply to [`START_COMMAND`].
pub const WELCOME: &str = "Hello! Send JSON data to aggregate.";

/// The three strings a request carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AggregationRequest {
    /// Inclusive range start.
    pub dt_from: String,
    /// Inclusive range end.
    pub dt_upto: String,
    /// `hour`, `day` or `month`.
    pub group_type: String,
}

/// Why a message could not be answered with a series.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The message text is not a JSON request object.
    #[error("Invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The engine rejected the request or its source.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The series could not be rendered.
    #[error("Failed to render response: {0}")]
    Render(serde_json::Error),
}

impl AggregationRequest {
    /// Parse a message body.
    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(text.trim())?)
    }

    /// Run the request against the BSON dump at `source`.
    pub fn execute(&self, source: &Path) -> Result<TimeSeries, AggregateError> {
        aggregate_file(&self.dt_from, &self.dt_upto, &self.group_type, source)
    }
}

/// Answer one inbound message.
///
/// Returns the series as JSON indented by `indent` spaces, the welcome text
/// for `/start`, or `Error: ...`.
pub fn handle_message(text: &str, source: &Path, indent: usize) -> String {
    if text.trim() == START_COMMAND {
        return WELCOME.to_string();
    }

    match answer(text, source, indent) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "request failed");
            format!("Error: {e}")
        }
    }
}

fn answer(text: &str, source: &Path, indent: usize) -> Result<String, RequestError> {
    let req = AggregationRequest::from_json(text)?;
    info!(
        dt_from = %req.dt_from,
        dt_upto = %req.dt_upto,
        group_type = %req.group_type,
        "aggregation request"
    );
    let series = req.execute(source)?;
    series.to_json_pretty(indent).map_err(RequestError::Render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_gets_welcome() {
        assert_eq!(handle_message(" /start\n", Path::new("unused"), 4), WELCOME);
    }

    #[test]
    fn non_json_is_reported() {
        let reply = handle_message("hello bot", Path::new("unused"), 4);
        assert!(reply.starts_with("Error: Invalid request payload"), "{reply}");
    }

    #[test]
    fn missing_field_is_reported() {
        let reply = handle_message(
            r#"{"dt_from": "2023-06-01T00:00:00", "dt_upto": "2023-06-02T00:00:00"}"#,
            Path::new("unused"),
            4,
        );
        assert!(reply.contains("group_type"), "{reply}");
    }

    #[test]
    fn bad_granularity_is_reported_without_touching_source() {
        let reply = handle_message(
            r#"{"dt_from": "2023-06-01T00:00:00", "dt_upto": "2023-06-02T00:00:00", "group_type": "week"}"#,
            Path::new("/no/such/source.bson"),
            4,
        );
        assert_eq!(reply, "Error: Unsupported group_type: week");
    }

    #[test]
    fn missing_source_is_reported() {
        let reply = handle_message(
            r#"{"dt_from": "2023-06-01T00:00:00", "dt_upto": "2023-06-02T00:00:00", "group_type": "day"}"#,
            Path::new("/no/such/source.bson"),
            4,
        );
        assert!(
            reply.starts_with("Error: Record source unavailable: /no/such/source.bson"),
            "{reply}"
        );
    }
}

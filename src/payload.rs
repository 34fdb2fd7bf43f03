use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Failure;

/// Field carrying the time the event happened.
pub const OCCURRED_AT_FIELD: &str = "occurred_at";

/// Event fields supplied by the caller.
pub type EventPayload = Map<String, Value>;

/// Formats a timestamp as ISO-8601 with an explicit UTC offset,
/// e.g. `2025-03-01T12:30:00+00:00`.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Serializes an event, adding `occurred_at` when the caller did not set it.
///
/// The payload must serialize to a JSON object. A caller-supplied
/// `occurred_at` is kept as is.
pub(crate) fn encode_event<T>(payload: &T, now: DateTime<Utc>) -> Result<Vec<u8>, Failure>
where
    T: Serialize + ?Sized,
{
    let mut fields = match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(Failure::new(
                0,
                format!(
                    "Event payload must be a JSON object, got {}",
                    json_kind(&other)
                ),
            ))
        }
        Err(err) => {
            return Err(Failure::new(
                0,
                format!("Failed to encode event payload: {err}"),
            ))
        }
    };

    fields
        .entry(OCCURRED_AT_FIELD)
        .or_insert_with(|| Value::String(format_timestamp(now)));

    serde_json::to_vec(&fields)
        .map_err(|err| Failure::new(0, format!("Failed to encode event payload: {err}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

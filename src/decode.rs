use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::{Failure, ResultRecord};

pub(crate) const INVALID_JSON_MESSAGE: &str = "Invalid JSON response from server";
pub(crate) const EMPTY_BODY_MESSAGE: &str = "HTTP error";
pub(crate) const NETWORK_ERROR_PREFIX: &str = "Network error: ";
pub(crate) const UNKNOWN_NETWORK_ERROR: &str = "Unknown cURL error";

/// Statuses worth another attempt: 429 and every 5xx.
pub(crate) fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() || status.as_u16() > 599
}

/// Decodes the body of a 2xx response.
pub(crate) fn normalize_success(status: StatusCode, body: &str) -> ResultRecord {
    if body.is_empty() {
        return ResultRecord::Success(Value::Object(Map::new()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => ResultRecord::Success(Value::Object(Map::new())),
        Ok(value) => ResultRecord::Success(value),
        Err(_) => Failure::new(status.as_u16(), INVALID_JSON_MESSAGE).into(),
    }
}

/// Builds the outcome of a response that will not be retried.
///
/// A JSON object body is the server's own error contract and wins over the
/// synthetic failure record.
pub(crate) fn normalize_failure(status: StatusCode, body: &str) -> ResultRecord {
    if body.is_empty() {
        return Failure::new(status.as_u16(), EMPTY_BODY_MESSAGE).into();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(body)) => ResultRecord::ServerError {
            status: status.as_u16(),
            body,
        },
        _ => Failure::new(status.as_u16(), body.trim()).into(),
    }
}

/// Failure record for a request that never produced an HTTP response.
pub(crate) fn network_failure(error_text: &str) -> ResultRecord {
    let detail = if error_text.trim().is_empty() {
        UNKNOWN_NETWORK_ERROR
    } else {
        error_text
    };
    Failure::new(0, format!("{NETWORK_ERROR_PREFIX}{detail}")).into()
}

/// Renders an error with its source chain, `reqwest` keeps the useful part
/// (connection refused, dns failure) in the sources.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let inner_text = inner.to_string();
        if !inner_text.is_empty() && !text.contains(&inner_text) {
            text.push_str(": ");
            text.push_str(&inner_text);
        }
        source = inner.source();
    }
    text
}

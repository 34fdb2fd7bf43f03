use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Normalized outcome of a request, including all retries.
///
/// Every request resolves to exactly one `ResultRecord`; transport and HTTP
/// failures are values, never errors.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultRecord {
    /// Decoded JSON body of a 2xx response, verbatim.
    ///
    /// An empty or `null` body is reported as an empty JSON object.
    Success(Value),
    /// Structured JSON error object returned by the server, verbatim.
    ServerError {
        /// HTTP status of the final attempt.
        status: u16,
        /// Error object as sent by the server.
        body: Map<String, Value>,
    },
    /// Client-side description of a failed request.
    Failed(Failure),
}

impl ResultRecord {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// HTTP status of a failed request, `0` for transport-level failures,
    /// `None` on success.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Success(_) => None,
            Self::ServerError { status, .. } => Some(*status),
            Self::Failed(failure) => Some(failure.code),
        }
    }

    /// Converts into the wire-compatible JSON shape.
    ///
    /// Success and server error bodies are returned as received; client-side
    /// failures use `{status: "failed", code, data: null, message, errors}`.
    pub fn into_json(self) -> Value {
        match self {
            Self::Success(value) => value,
            Self::ServerError { body, .. } => Value::Object(body),
            Self::Failed(failure) => failure.into_json(),
        }
    }
}

impl From<Failure> for ResultRecord {
    fn from(failure: Failure) -> Self {
        Self::Failed(failure)
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(value) => value.serialize(serializer),
            Self::ServerError { body, .. } => body.serialize(serializer),
            Self::Failed(failure) => failure.serialize(serializer),
        }
    }
}

/// Client-side failure record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// HTTP status, or `0` when no HTTP response was received.
    pub code: u16,
    pub message: String,
    pub errors: Option<Map<String, Value>>,
}

impl Failure {
    pub const STATUS: &'static str = "failed";

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn into_json(self) -> Value {
        json!({
            "status": Self::STATUS,
            "code": self.code,
            "data": null,
            "message": self.message,
            "errors": self.errors,
        })
    }
}

#[derive(Serialize)]
struct FailureBody<'a> {
    status: &'static str,
    code: u16,
    data: Option<()>,
    message: &'a str,
    errors: Option<&'a Map<String, Value>>,
}

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FailureBody {
            status: Self::STATUS,
            code: self.code,
            data: None,
            message: &self.message,
            errors: self.errors.as_ref(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Failure, ResultRecord};

    #[test]
    fn failure_serializes_to_fixed_shape() {
        let failure = Failure::new(503, "Service Unavailable");
        let expected = json!({
            "status": "failed",
            "code": 503,
            "data": null,
            "message": "Service Unavailable",
            "errors": null,
        });
        assert_eq!(serde_json::to_value(&failure).expect("serializable"), expected);
        assert_eq!(failure.into_json(), expected);
    }

    #[test]
    fn server_error_body_is_passed_through() {
        let body = json!({"status": "error", "message": "bad input", "errors": {"name": ["required"]}});
        let record = ResultRecord::ServerError {
            status: 422,
            body: body.as_object().cloned().expect("object"),
        };
        assert_eq!(record.code(), Some(422));
        assert!(!record.is_success());
        assert_eq!(serde_json::to_value(&record).expect("serializable"), body);
        assert_eq!(record.into_json(), body);
    }

    #[test]
    fn success_reports_no_code() {
        let record = ResultRecord::Success(json!({"id": 7}));
        assert!(record.is_success());
        assert_eq!(record.code(), None);
        assert_eq!(record.into_json(), json!({"id": 7}));
    }

    #[test]
    fn transport_failure_has_code_zero() {
        let record = ResultRecord::from(Failure::new(0, "Network error: refused"));
        assert_eq!(record.code(), Some(0));
    }
}

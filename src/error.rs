/// Error type returned when a client cannot be constructed.
///
/// Request execution never produces this error: every request outcome is
/// reported as a [`ResultRecord`](crate::ResultRecord).
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    /// A configuration value failed validation.
    #[error("{0}")]
    InvalidConfig(String),
    /// The underlying `reqwest` client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl EventsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

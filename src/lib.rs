//! `event-api-client` is an async client for an HTTP event ingestion API.
//!
//! Events are posted to `{base_url}/events` with project key and access
//! token headers. Transport errors, `429` and `5xx` responses are retried
//! with jittered exponential backoff; every call resolves to a
//! [`ResultRecord`] instead of an error:
//! - [`EventsClient::submit_event`]
//! - [`EventsClient::send_with_retry`]

mod backoff;
mod client;
mod config;
mod decode;
mod error;
mod options;
mod outcome;
mod payload;

#[cfg(feature = "global-client")]
pub mod global;

pub use client::{EventsClient, ACCESS_TOKEN_HEADER, PROJECT_KEY_HEADER, USER_AGENT};
pub use config::{
    ClientConfig, ACCESS_TOKEN_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, PROJECT_KEY_ENV,
};
pub use error::EventsError;
pub use options::ClientOptions;
pub use outcome::{Failure, ResultRecord};
pub use payload::{EventPayload, OCCURRED_AT_FIELD};
pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, EventsError>;

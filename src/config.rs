use std::fmt;

use reqwest::{header::HeaderValue, Url};

use crate::{ClientOptions, EventsError, Result};

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "EVENTS_BASE_URL";
/// Environment variable holding the project key.
pub const PROJECT_KEY_ENV: &str = "PROJECT_KEY";
/// Environment variable holding the access token.
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";
/// Base URL used when [`BASE_URL_ENV`] is unset or empty.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

const EVENTS_PATH: &str = "/events";

/// Validated, immutable client configuration.
///
/// Construction fails fast: a `ClientConfig` value always carries a
/// non-empty absolute base URL, non-empty credentials and valid options.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    project_key: String,
    access_token: String,
    options: ClientOptions,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("project_key", &self.project_key)
            .field("access_token", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl ClientConfig {
    /// Validates and builds a configuration.
    ///
    /// Trailing slashes are stripped from `base_url`.
    pub fn new(
        base_url: impl AsRef<str>,
        project_key: impl Into<String>,
        access_token: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        let project_key = require_header_value(project_key.into(), "Project key")?;
        let access_token = require_header_value(access_token.into(), "Access token")?;
        options.validate()?;

        Ok(Self {
            base_url,
            project_key,
            access_token,
            options,
        })
    }

    /// Builds a configuration from environment variables with default options.
    ///
    /// Reads:
    /// - `EVENTS_BASE_URL` — API base URL (default `http://127.0.0.1:8000/api/v1`)
    /// - `PROJECT_KEY` — project key
    /// - `ACCESS_TOKEN` — access token
    ///
    /// Unset and empty variables fall back to their defaults, so a missing
    /// project key or access token fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_options(ClientOptions::default())
    }

    /// Same as [`ClientConfig::from_env`] with explicit options.
    pub fn from_env_with_options(options: ClientOptions) -> Result<Self> {
        Self::from_env_or(None, None, None, options)
    }

    /// Builds a configuration from the given values, reading each missing
    /// one from its environment variable.
    pub fn from_env_or(
        base_url: Option<String>,
        project_key: Option<String>,
        access_token: Option<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        Self::new(
            base_url.unwrap_or_else(|| env_or(BASE_URL_ENV, DEFAULT_BASE_URL)),
            project_key.unwrap_or_else(|| env_or(PROJECT_KEY_ENV, "")),
            access_token.unwrap_or_else(|| env_or(ACCESS_TOKEN_ENV, "")),
            options,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Full URL of the event ingestion endpoint.
    pub fn events_url(&self) -> String {
        format!("{}{EVENTS_PATH}", self.base_url)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(EventsError::invalid("Base URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|err| EventsError::invalid(format!("Base URL '{trimmed}' is invalid: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EventsError::invalid(format!(
            "Base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(trimmed.to_owned())
}

fn require_header_value(value: String, label: &str) -> Result<String> {
    if value.is_empty() {
        return Err(EventsError::invalid(format!("{label} cannot be empty")));
    }
    HeaderValue::from_str(&value).map_err(|_| {
        EventsError::invalid(format!("{label} contains characters not allowed in a header"))
    })?;
    Ok(value)
}

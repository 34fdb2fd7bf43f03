use std::fmt;
use std::time::Duration;

use chrono::Utc;
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    redirect, Method, RequestBuilder, StatusCode,
};
use serde::Serialize;
use tokio::time::sleep;

use crate::{
    backoff::{jitter_factor, Backoff},
    decode::{error_chain, network_failure, normalize_failure, normalize_success, retryable_status},
    payload::encode_event,
    ClientConfig, ClientOptions, EventsError, Result, ResultRecord,
};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = "EventApiClient/1.0.0";
/// Header carrying the project key.
pub const PROJECT_KEY_HEADER: &str = "x-project-key";
/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// HTTP client for the event ingestion API.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// client can be handed to every part of an application that emits events.
#[derive(Clone)]
pub struct EventsClient {
    http: reqwest::Client,
    config: ClientConfig,
    headers: HeaderMap,
}

impl fmt::Debug for EventsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsClient")
            .field("config", &self.config)
            .finish()
    }
}

impl EventsClient {
    /// Creates a client with default [`ClientOptions`].
    ///
    /// Fails if any argument is empty or the base URL is not an absolute
    /// http(s) URL.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use event_api_client::EventsClient;
    ///
    /// let events = EventsClient::new("https://events.example.com/api/v1", "proj", "token")?;
    /// # Ok::<(), event_api_client::EventsError>(())
    /// ```
    pub fn new(
        base_url: impl AsRef<str>,
        project_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Self::new_with_options(base_url, project_key, access_token, ClientOptions::default())
    }

    /// Creates a client with explicit timeout and retry options.
    pub fn new_with_options(
        base_url: impl AsRef<str>,
        project_key: impl Into<String>,
        access_token: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        Self::from_config(ClientConfig::new(
            base_url,
            project_key,
            access_token,
            options,
        )?)
    }

    /// Creates a client from an already validated configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(EventsError::HttpClient)?;
        let headers = default_headers(&config)?;

        Ok(Self {
            http,
            config,
            headers,
        })
    }

    /// Creates a client from `EVENTS_BASE_URL`, `PROJECT_KEY` and
    /// `ACCESS_TOKEN`. See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submits one event to `{base_url}/events`.
    ///
    /// `occurred_at` is set to the current UTC time unless the payload
    /// already carries it. A payload that does not serialize to a JSON object
    /// yields a [`ResultRecord::Failed`] with code `0` and no request is sent.
    pub async fn submit_event<T>(&self, payload: &T) -> ResultRecord
    where
        T: Serialize + ?Sized,
    {
        let body = match encode_event(payload, Utc::now()) {
            Ok(body) => body,
            Err(failure) => return failure.into(),
        };
        self.send_with_retry(Method::POST, &self.config.events_url(), Some(body))
            .await
    }

    /// Sends a request, retrying transient failures with exponential backoff.
    ///
    /// Retries cover transport errors, `429` and `5xx` responses, at most
    /// `max_retries` times after the initial attempt. The result is always a
    /// [`ResultRecord`]; this method never fails.
    pub async fn send_with_retry(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> ResultRecord {
        let options = self.config.options();
        let timeout = Duration::from_millis(options.timeout_ms);
        let mut backoff = Backoff::new(options);

        loop {
            let mut request = self
                .http
                .request(method.clone(), url)
                .headers(self.headers.clone())
                .timeout(timeout);
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            match Self::execute_once(request).await {
                Ok((status, text)) => {
                    if status.is_success() {
                        return normalize_success(status, &text);
                    }

                    if retryable_status(status) {
                        if backoff.can_retry(options.max_retries) {
                            self.wait_before_retry(&mut backoff, status.as_str()).await;
                            continue;
                        }
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            status = status.as_u16(),
                            attempts = backoff.attempt() + 1,
                            "giving up on {url} after retryable status"
                        );
                    }

                    return normalize_failure(status, &text);
                }
                Err(err) => {
                    if should_retry_transport(&err) {
                        if backoff.can_retry(options.max_retries) {
                            self.wait_before_retry(&mut backoff, "transport error").await;
                            continue;
                        }
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            attempts = backoff.attempt() + 1,
                            "giving up on {url} after transport error: {err}"
                        );
                    }

                    return network_failure(&error_chain(&err));
                }
            }
        }
    }

    async fn execute_once(
        request: RequestBuilder,
    ) -> std::result::Result<(StatusCode, String), reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Sleeps for the next backoff delay and advances the attempt counter.
    async fn wait_before_retry(&self, backoff: &mut Backoff, reason: &str) {
        let delay = backoff.next_delay(jitter_factor(&mut rand::rng()));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt = backoff.attempt(),
            delay_ms = delay.as_millis() as u64,
            "retrying event request after {reason}"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = reason;

        sleep(delay).await;
    }
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() || err.is_decode()
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut project_key = HeaderValue::from_str(config.project_key())
        .map_err(|_| EventsError::invalid("Project key contains characters not allowed in a header"))?;
    project_key.set_sensitive(true);
    let mut access_token = HeaderValue::from_str(config.access_token())
        .map_err(|_| EventsError::invalid("Access token contains characters not allowed in a header"))?;
    access_token.set_sensitive(true);

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(HeaderName::from_static(PROJECT_KEY_HEADER), project_key);
    headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), access_token);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

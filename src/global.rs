//! Process-wide convenience client.
//!
//! Enabled with the `global-client` feature. Prefer passing an
//! [`EventsClient`] explicitly; this module is for call sites where that is
//! impractical.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use crate::{ClientConfig, EventsClient, Failure, Result, ResultRecord};

static SHARED: RwLock<Option<EventsClient>> = RwLock::new(None);

/// Builds the shared client from `config`, replacing any previous one.
pub fn configure(config: ClientConfig) -> Result<()> {
    using(EventsClient::from_config(config)?);
    Ok(())
}

/// Installs `client` as the shared client.
pub fn using(client: EventsClient) {
    *SHARED.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
}

/// Removes the shared client; the next [`track`] reads the environment again.
pub fn reset() {
    *SHARED.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Returns the shared client, building it from the environment on first use.
pub fn shared() -> Result<EventsClient> {
    if let Some(client) = SHARED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Ok(client.clone());
    }

    let mut slot = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(client) = slot.as_ref() {
        return Ok(client.clone());
    }
    let client = EventsClient::from_env()?;
    *slot = Some(client.clone());
    Ok(client)
}

/// Alias of [`track`].
pub async fn track_event<T>(payload: &T) -> ResultRecord
where
    T: Serialize + ?Sized,
{
    track(payload).await
}

/// Submits an event through the shared client.
///
/// If no client is configured and the environment does not hold a valid
/// configuration, the configuration error is reported as a failure record
/// with code `0`.
pub async fn track<T>(payload: &T) -> ResultRecord
where
    T: Serialize + ?Sized,
{
    match shared() {
        Ok(client) => client.submit_event(payload).await,
        Err(err) => Failure::new(0, err.to_string()).into(),
    }
}

use std::time::Duration;

use rand::Rng;

use crate::ClientOptions;

/// Lower bound of the multiplicative jitter applied to each retry delay.
pub(crate) const JITTER_MIN: f64 = 0.875;
/// Upper bound of the multiplicative jitter applied to each retry delay.
pub(crate) const JITTER_MAX: f64 = 1.125;

/// Attempt state for one logical request.
///
/// `attempt` counts retries already scheduled; the initial attempt is 0.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Backoff {
    attempt: usize,
    current_delay_ms: u64,
    factor: f64,
    max_delay_ms: u64,
}

impl Backoff {
    pub(crate) fn new(options: &ClientOptions) -> Self {
        Self {
            attempt: 0,
            current_delay_ms: options.initial_delay_ms,
            factor: options.backoff_factor,
            max_delay_ms: options.max_delay_ms,
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn attempt(&self) -> usize {
        self.attempt
    }

    pub(crate) fn can_retry(&self, max_retries: usize) -> bool {
        self.attempt < max_retries
    }

    /// Moves to the next attempt and returns how long to wait before it.
    ///
    /// The wait is the jittered current delay capped at `max_delay_ms`; the
    /// delay then grows by `factor`, also capped.
    pub(crate) fn next_delay(&mut self, jitter: f64) -> Duration {
        self.attempt += 1;
        let sleep_ms = capped(self.current_delay_ms as f64 * jitter, self.max_delay_ms);
        self.current_delay_ms = capped(self.current_delay_ms as f64 * self.factor, self.max_delay_ms);
        Duration::from_millis(sleep_ms)
    }
}

fn capped(value_ms: f64, max_ms: u64) -> u64 {
    // `as` saturates for out-of-range floats, so an overflowing product lands on the cap.
    (value_ms.min(max_ms as f64).max(0.0)) as u64
}

/// Draws a jitter factor uniformly from `[JITTER_MIN, JITTER_MAX]`.
pub(crate) fn jitter_factor<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(JITTER_MIN..=JITTER_MAX)
}

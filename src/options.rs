use crate::{EventsError, Result};

/// Configures request timeout and retry behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each retry. Must be at least `1.0`.
    pub backoff_factor: f64,
    /// Upper bound for any single retry delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Per-attempt timeout in milliseconds. Must be at least `1000`.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 400,
            backoff_factor: 2.0,
            max_delay_ms: 8_000,
            timeout_ms: 10_000,
        }
    }
}

impl ClientOptions {
    pub const MIN_TIMEOUT_MS: u64 = 1_000;

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay_ms(mut self, initial_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self
    }

    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Checks the invariants that cannot be expressed by the field types.
    pub fn validate(&self) -> Result<()> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(EventsError::invalid(format!(
                "Backoff factor must be a finite number >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        if self.timeout_ms < Self::MIN_TIMEOUT_MS {
            return Err(EventsError::invalid(format!(
                "Timeout must be at least {} ms, got {}",
                Self::MIN_TIMEOUT_MS,
                self.timeout_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ClientOptions;

    #[test]
    fn defaults_match_documented_values() {
        let opts = ClientOptions::default();
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.initial_delay_ms, 400);
        assert_eq!(opts.backoff_factor, 2.0);
        assert_eq!(opts.max_delay_ms, 8_000);
        assert_eq!(opts.timeout_ms, 10_000);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_backoff_factor_below_one() {
        let err = ClientOptions::default()
            .with_backoff_factor(0.5)
            .validate()
            .expect_err("factor below 1.0 must be rejected");
        assert!(err.to_string().contains("Backoff factor"));

        assert!(ClientOptions::default()
            .with_backoff_factor(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_sub_second_timeout() {
        assert!(ClientOptions::default()
            .with_timeout_ms(999)
            .validate()
            .is_err());
        assert!(ClientOptions::default()
            .with_timeout_ms(1_000)
            .validate()
            .is_ok());
    }

    #[test]
    fn zero_retries_and_zero_delays_are_allowed() {
        let opts = ClientOptions::default()
            .with_max_retries(0)
            .with_initial_delay_ms(0)
            .with_max_delay_ms(0);
        assert!(opts.validate().is_ok());
    }
}

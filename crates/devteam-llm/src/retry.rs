//! Bounded exponential backoff around the network call

use std::future::Future;
use std::time::Duration;

use devteam_config::{ProviderKind, RetryConfig};

use crate::error::LlmError;

/// How many times a call is attempted and how long to wait in between
///
/// The delay doubles after every failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Build from the `[llm.retry]` configuration section
    pub fn from_config(config: &RetryConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.max_attempts, config.initial_delay()?))
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Run `op` until it succeeds, fails for good, or attempts run out
    ///
    /// `op` receives the 1-based attempt number. Only errors for which
    /// [`LlmError::is_retryable`] holds are retried; the last error is
    /// returned once attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, provider: ProviderKind, model: &str, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(
                        %provider,
                        model,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "retrying model call"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

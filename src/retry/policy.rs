//! Backoff for plain translation and history requests.
//!
//! Streams are never retried: by the time a stream fails, part of the
//! translation may already be on screen.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::error::{Result, TranslatorError};

/// Exponential backoff with optional proportional jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `1` disables retrying.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the computed delay, or `None` for exact delays.
    pub jitter: Option<f64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: Some(0.1),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self::default().with_max_attempts(1)
    }

    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Turn jitter on (at the default 10%) or off.
    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled.then_some(0.1);
        self
    }

    /// Jitter fraction, clamped to `0.0..=1.0`.
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter = Some(factor.clamp(0.0, 1.0));
        self
    }

    /// Whether `error` after attempt number `attempt` (1-based) deserves
    /// another try.
    pub fn should_retry(&self, error: &TranslatorError, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1) && error.is_retryable()
    }

    /// Wait before the retry that follows attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = Duration::from_millis(millis as u64).min(self.max_delay);

        match self.jitter {
            Some(fraction) if fraction > 0.0 => {
                let spread = capped.as_millis() as f64 * fraction;
                if spread < 1.0 {
                    return capped;
                }
                let offset = rand::thread_rng().gen_range(-spread..=spread);
                let jittered = (capped.as_millis() as f64 + offset).max(0.0);
                Duration::from_millis(jittered as u64).min(self.max_delay)
            }
            _ => capped,
        }
    }
}

/// Drives a request future factory under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Call `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent. The last error is returned.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            if !self.policy.should_retry(&error, attempt) {
                if attempt > 1 {
                    tracing::debug!(target: "fanyi::retry", attempts = attempt, error = %error, "giving up");
                }
                return Err(error);
            }

            let delay = self.policy.delay_after(attempt);
            tracing::debug!(
                target: "fanyi::retry",
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

//! Exponential backoff with optional jitter.

use super::strategy::{Attempt, BackoffStrategy, RetryError};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff strategy with configurable jitter.
///
/// After attempt `n` (1-based) fails transiently, the strategy waits
/// `initial_delay * multiplier^n`, capped at `max_delay`. With the defaults
/// that is `100ms * 2^n`: 200ms, 400ms, 800ms, 1.6s between five attempts.
///
/// # Mathematical Formula
///
/// ```text
/// base_delay   = initial_delay * (multiplier ^ n)
/// jitter_range = base_delay * jitter
/// final_delay  = min(base_delay + random(-jitter_range, +jitter_range), max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use gaws_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// // Defaults: 5 attempts, 100ms initial delay, 2x multiplier, no jitter
/// let backoff = ExponentialBackoff::default();
/// assert_eq!(backoff.max_attempts(), 5);
/// assert_eq!(backoff.next_delay(1), Some(Duration::from_millis(200)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Default number of attempts, including the first one.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    /// Default base delay.
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(100);

    /// Default upper bound on a single delay.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(20);

    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Base delay before jitter and exponent are applied.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound on a single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Growth factor applied per attempt.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Jitter factor in `[0.0, 1.0]`.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: 2.0,
            jitter: 0.0,
        }
    }
}

#[async_trait]
impl BackoffStrategy for ExponentialBackoff {
    async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut + Send,
        Fut: Future<Output = Attempt<T, E>> + Send,
        T: Send,
        E: Send,
    {
        // A zero budget still makes one attempt
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Attempt::Done(Ok(value)) => return Ok(value),
                Attempt::Done(Err(err)) => return Err(RetryError::Failed(err)),
                Attempt::Retry(err) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Attempt::Retry(_) => {
                    if let Some(delay) = self.next_delay(attempt) {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            attempt,
                            max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            "Transient failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        let jittered = if self.jitter > 0.0 {
            // Range is [base * (1 - jitter), base * (1 + jitter)]
            let jitter_amount = base_delay * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            base_delay + jitter_amount
        } else {
            base_delay
        };

        let capped = jittered.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Some(Duration::from_secs_f64(capped))
        } else {
            None
        }
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Builder for configuring [`ExponentialBackoff`].
///
/// # Examples
///
/// ```rust
/// use gaws_core::retry::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_attempts(3)
///     .initial_delay(Duration::from_millis(50))
///     .max_delay(Duration::from_secs(2))
///     .jitter(0.1)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_attempts: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the total number of attempts, including the first one.
    ///
    /// Default: 5
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the base delay.
    ///
    /// Default: 100ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between attempts.
    ///
    /// Default: 20s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor, clamped to `[0.0, 1.0]`.
    ///
    /// Default: 0.0
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the `ExponentialBackoff`, using defaults for unset parameters.
    pub fn build(self) -> ExponentialBackoff {
        let defaults = ExponentialBackoff::default();
        ExponentialBackoff {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_delay: self.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
            multiplier: self.multiplier.unwrap_or(defaults.multiplier),
            jitter: self.jitter.unwrap_or(defaults.jitter),
        }
    }
}

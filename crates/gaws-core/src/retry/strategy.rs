//! The retry strategy trait and the values it passes around.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Outcome of a single attempt, as reported by the operation being retried.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// The operation finished. `Ok` and permanent errors are both returned
    /// to the caller as-is.
    Done(Result<T, E>),

    /// The operation hit a transient failure. It is attempted again after a
    /// backoff delay, unless the attempt budget is spent.
    Retry(E),
}

/// Error returned by [`BackoffStrategy::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation reported a permanent failure; no further attempts were made.
    Failed(E),

    /// Every attempt was a transient failure. Carries the number of attempts
    /// made and the failure reported by the last one.
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Failure reported by the last attempt.
        last: E,
    },
}

impl<E> RetryError<E> {
    /// The underlying failure, whichever way the loop ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Failed(err) => err,
            RetryError::Exhausted { last, .. } => last,
        }
    }

    /// Whether the loop gave up because the attempt budget was spent.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Failed(err) => write!(f, "{}", err),
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Failed(err) => Some(err),
            RetryError::Exhausted { last, .. } => Some(last),
        }
    }
}

/// A strategy for retrying failed operations with backoff.
///
/// The operation decides for itself whether a failure is transient by
/// returning [`Attempt::Retry`]; the strategy only decides how many attempts
/// are allowed and how long to wait between them. Attempts are strictly
/// sequential: the next one starts only after the previous one resolved and
/// the delay elapsed.
///
/// # Examples
///
/// ```rust
/// use gaws_core::retry::{Attempt, BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// # async fn example() {
/// let backoff = ExponentialBackoff::builder()
///     .max_attempts(3)
///     .initial_delay(Duration::from_millis(1))
///     .build();
///
/// let result = backoff
///     .execute(|attempt| async move {
///         if attempt < 2 {
///             Attempt::Retry("busy")
///         } else {
///             Attempt::Done(Ok::<_, &str>(42))
///         }
///     })
///     .await;
///
/// assert_eq!(result, Ok(42));
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Run `operation` until it finishes, fails permanently, or the attempt
    /// budget is spent.
    ///
    /// The operation receives the 1-based number of the attempt it is running.
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut + Send,
        Fut: Future<Output = Attempt<T, E>> + Send,
        T: Send,
        E: Send;

    /// Delay to wait after the given 1-based attempt failed transiently.
    ///
    /// Returning `None` retries immediately.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Total number of attempts allowed, including the first one.
    fn max_attempts(&self) -> u32;
}

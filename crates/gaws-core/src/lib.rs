#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions shared by the gaws AWS clients.
//!
//! This crate holds the retry machinery the service clients build on:
//!
//! - **[`BackoffStrategy`](retry::BackoffStrategy)**, a strategy trait that
//!   drives an operation through a bounded number of attempts
//! - **[`ExponentialBackoff`](retry::ExponentialBackoff)**, exponential
//!   backoff with optional jitter
//!
//! The operation being retried classifies its own failures through
//! [`Attempt`](retry::Attempt), so the strategy stays ignorant of HTTP and
//! of any particular service's error format.
//!
//! # Examples
//!
//! ```rust
//! use gaws_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let backoff = ExponentialBackoff::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build();
//!
//! let result = backoff
//!     .execute(|_attempt| async { Attempt::Done(Ok::<_, std::io::Error>(42)) })
//!     .await;
//! assert_eq!(result.ok(), Some(42));
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use gaws_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{
        Attempt, BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder, RetryError,
    };
}

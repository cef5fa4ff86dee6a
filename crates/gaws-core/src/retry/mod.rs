//! Retry strategies and backoff implementations.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`ExponentialBackoff`] - Exponential backoff with jitter
//! - [`Attempt`] - What a single attempt reports back to the strategy
//! - [`RetryError`] - How a retry loop can fail

mod exponential;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use strategy::{Attempt, BackoffStrategy, RetryError};

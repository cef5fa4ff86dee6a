//! Centralized observability utilities for structured logging
//!
//! Every AWS call and every consumer loop logs through this layer, so the
//! field names stay the same across services.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// AWS request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Service signing name (kinesis, sqs, ...)
    pub service: &'static str,
    /// Operation name (PutRecord, ValidateTemplate, ...)
    pub operation: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(service: &'static str, operation: impl Into<String>) -> Self {
        Self {
            service,
            operation: operation.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log one attempt being sent
    pub fn log_attempt(&self, attempt: u32) {
        debug!(
            service = self.service,
            operation = %self.operation,
            attempt,
            body_size = self.body_size,
            "Sending AWS request"
        );
    }

    /// Log a transient failure that will be retried
    pub fn log_retry(&self, attempt: u32, status: u16, error_type: &str) {
        warn!(
            service = self.service,
            operation = %self.operation,
            attempt,
            status,
            error_type = %error_type,
            "Transient AWS error"
        );
    }
}

/// AWS response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code of the last response, if one arrived
    pub status: Option<u16>,
    /// Response body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Time elapsed for the whole call, backoff included
    pub elapsed: Duration,
    /// Number of attempts made
    pub attempts: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(elapsed: Duration) -> Self {
        Self {
            status: None,
            body_size: None,
            elapsed,
            attempts: 1,
        }
    }

    /// Set the status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the response body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Set the number of attempts
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Log successful call
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            service = request.service,
            operation = %request.operation,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            body_size = self.body_size,
            attempts = self.attempts,
            "AWS request succeeded"
        );
    }

    /// Log failed call
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            service = request.service,
            operation = %request.operation,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %error,
            attempts = self.attempts,
            "AWS request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Logging context for a record consumer loop
pub struct ConsumerContext {
    /// Stream being consumed
    pub stream: String,
    /// Batches fetched so far
    pub batch_count: u32,
    /// Records delivered so far
    pub record_count: u64,
    timer: RequestTimer,
}

impl ConsumerContext {
    /// Create new consumer context
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            batch_count: 0,
            record_count: 0,
            timer: RequestTimer::start(),
        }
    }

    /// Log consumer started
    pub fn log_started(&self) {
        debug!(stream = %self.stream, "Record consumer started");
    }

    /// Log a fetched batch
    pub fn log_batch(&mut self, records: usize) {
        self.batch_count += 1;
        self.record_count += records as u64;
        debug!(
            stream = %self.stream,
            batch_num = self.batch_count,
            records,
            "Record batch received"
        );
    }

    /// Log consumer finished because the shard was closed
    pub fn log_complete(&self) {
        info!(
            stream = %self.stream,
            batch_count = self.batch_count,
            record_count = self.record_count,
            elapsed_ms = self.timer.elapsed().as_millis() as u64,
            "Shard closed, record consumer finished"
        );
    }

    /// Log consumer stopped by cancellation
    pub fn log_cancelled(&self) {
        debug!(
            stream = %self.stream,
            record_count = self.record_count,
            "Record consumer cancelled"
        );
    }

    /// Log consumer error
    pub fn log_error(&self, error: &str) {
        warn!(
            stream = %self.stream,
            batch_count = self.batch_count,
            record_count = self.record_count,
            error = %error,
            "Record consumer stopped on error"
        );
    }
}

//! Error types for the gaws clients
//!
//! Every fallible operation returns [`Result`]. Service failures keep the
//! decoded AWS error document in a [`ServiceError`], so callers can match on
//! the AWS error type without parsing messages.

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// Result type alias for operations that can fail with a gaws error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type reported once the retry budget is spent.
pub const EXCEEDED_MAX_RETRIES: &str = "GawsExceededMaxRetries";

/// An error document returned by an AWS service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// HTTP status code of the response
    pub status: u16,
    /// AWS error type, e.g. `ResourceNotFoundException`
    pub error_type: String,
    /// Human readable message, empty when the service sent none
    pub message: String,
    /// Request id, when the service reported one
    pub request_id: Option<String>,
}

impl ServiceError {
    /// Create a service error without a request id.
    pub fn new(status: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type: error_type.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Attach a request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Main error type for the gaws clients.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or connection error. Never retried.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with an error status whose body is not a valid
    /// error document.
    #[error("Malformed error response (status {status}): {reason}")]
    MalformedResponse {
        /// HTTP status code
        status: u16,
        /// Why the body could not be decoded
        reason: String,
    },

    /// The service rejected the request with a permanent error.
    #[error(transparent)]
    Service(ServiceError),

    /// Every attempt failed with a transient error.
    #[error("GawsExceededMaxRetries: The maximum number of retries for this request was exceeded.")]
    ExceededMaxRetries {
        /// Number of attempts made
        attempts: u32,
        /// Error reported by the last attempt
        last_error: ServiceError,
        /// Raw body of the last response
        body: Bytes,
    },

    /// A successful response could not be decoded into the expected shape.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Region name not in the known region table.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Request signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Base64 payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if retrying the whole call later could succeed.
    ///
    /// Transient service errors are already retried inside a call; this is
    /// for callers deciding what to do with the final outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::ExceededMaxRetries { .. }
        )
    }

    /// The service error carried by this error, if any.
    ///
    /// For [`Error::ExceededMaxRetries`] this is the error of the last attempt.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(err) => Some(err),
            Error::ExceededMaxRetries { last_error, .. } => Some(last_error),
            _ => None,
        }
    }

    /// The AWS error type, or [`EXCEEDED_MAX_RETRIES`] for the retry sentinel.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Error::Service(err) => Some(&err.error_type),
            Error::ExceededMaxRetries { .. } => Some(EXCEEDED_MAX_RETRIES),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Connection(err.to_string())
    }
}

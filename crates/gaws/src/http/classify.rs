//! Retry classification of AWS responses
//!
//! A classifier looks at the status code and raw body of one response and
//! decides whether the call succeeded, failed for good, or should be
//! attempted again. Each protocol has its own error document, so each
//! service picks the classifier matching its wire format.

use crate::error::{Error, Result, ServiceError};
use serde::Deserialize;

/// Error types that JSON services use for throttling.
pub const JSON_THROTTLING_TYPES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ProvisionedThroughputExceededException",
];

/// Error types that Query services use for throttling.
pub const QUERY_THROTTLING_TYPES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestThrottled",
    "RequestLimitExceeded",
];

/// What to do with one response.
#[derive(Debug)]
pub enum Verdict {
    /// The call succeeded; the body is the result.
    Success,
    /// Transient failure; attempt again after a backoff delay.
    Retry(ServiceError),
    /// Permanent failure; return this error to the caller.
    Fail(Error),
}

/// Decides the [`Verdict`] for a response.
///
/// Implementations must be pure: the same status and body always yield the
/// same verdict. Any `Fn(u16, &[u8]) -> Verdict` closure is a classifier.
pub trait RetryClassifier: Send + Sync {
    /// Classify one response.
    fn classify(&self, status: u16, body: &[u8]) -> Verdict;
}

impl<F> RetryClassifier for F
where
    F: Fn(u16, &[u8]) -> Verdict + Send + Sync,
{
    fn classify(&self, status: u16, body: &[u8]) -> Verdict {
        self(status, body)
    }
}

/// Classifier for JSON 1.1 services such as Kinesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorClassifier;

impl RetryClassifier for JsonErrorClassifier {
    fn classify(&self, status: u16, body: &[u8]) -> Verdict {
        if status < 400 {
            return Verdict::Success;
        }
        match parse_json_error(status, body) {
            Ok(error) => verdict_for(error, JSON_THROTTLING_TYPES),
            Err(e) => Verdict::Fail(e),
        }
    }
}

/// Classifier for Query services such as CloudFormation and SQS.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryErrorClassifier;

impl RetryClassifier for QueryErrorClassifier {
    fn classify(&self, status: u16, body: &[u8]) -> Verdict {
        if status < 400 {
            return Verdict::Success;
        }
        match parse_query_error(status, body) {
            Ok(error) => verdict_for(error, QUERY_THROTTLING_TYPES),
            Err(e) => Verdict::Fail(e),
        }
    }
}

fn verdict_for(error: ServiceError, throttling_types: &[&str]) -> Verdict {
    if error.status >= 500 || throttling_types.contains(&error.error_type.as_str()) {
        Verdict::Retry(error)
    } else {
        Verdict::Fail(Error::Service(error))
    }
}

#[derive(Deserialize)]
struct JsonErrorDocument {
    #[serde(rename = "__type")]
    error_type: String,
    #[serde(default, alias = "Message")]
    message: String,
}

/// Decode a JSON error document such as
/// `{"__type": "ResourceNotFoundException", "message": "..."}`.
///
/// A `namespace#` prefix on the type is dropped.
pub fn parse_json_error(status: u16, body: &[u8]) -> Result<ServiceError> {
    let document: JsonErrorDocument =
        serde_json::from_slice(body).map_err(|e| Error::MalformedResponse {
            status,
            reason: e.to_string(),
        })?;

    let error_type = match document.error_type.rsplit_once('#') {
        Some((_, short)) => short.to_string(),
        None => document.error_type,
    };

    Ok(ServiceError::new(status, error_type, document.message))
}

#[derive(Deserialize)]
struct QueryErrorResponse {
    #[serde(rename = "Error")]
    error: QueryErrorBody,
    #[serde(rename = "RequestId", default)]
    request_id: Option<String>,
}

#[derive(Deserialize)]
struct QueryErrorBody {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: Option<String>,
}

/// Decode a Query error document such as
/// `<ErrorResponse><Error><Type>Sender</Type><Code>...</Code><Message>...</Message></Error><RequestId>...</RequestId></ErrorResponse>`.
///
/// `Code` becomes the error type.
pub fn parse_query_error(status: u16, body: &[u8]) -> Result<ServiceError> {
    let malformed = |reason: String| Error::MalformedResponse { status, reason };

    let text = std::str::from_utf8(body).map_err(|e| malformed(e.to_string()))?;
    let document: QueryErrorResponse =
        quick_xml::de::from_str(text).map_err(|e| malformed(e.to_string()))?;

    let mut error = ServiceError::new(
        status,
        document.error.code,
        document.error.message.unwrap_or_default(),
    );
    if let Some(request_id) = document.request_id {
        error = error.with_request_id(request_id);
    }
    Ok(error)
}

//! HTTP layer: request descriptors, response classification and the
//! signed, retrying dispatcher every service client goes through.

pub use classify::{
    JSON_THROTTLING_TYPES, JsonErrorClassifier, QUERY_THROTTLING_TYPES, QueryErrorClassifier,
    RetryClassifier, Verdict, parse_json_error, parse_query_error,
};
pub use dispatch::Dispatcher;
pub use request::AwsRequest;

mod classify;
mod dispatch;
mod request;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

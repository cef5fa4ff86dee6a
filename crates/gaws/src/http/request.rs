//! AWS request descriptor

use super::classify::{JsonErrorClassifier, QueryErrorClassifier, RetryClassifier};
use crate::error::{Error, Result};
use crate::region::Service;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// One AWS call, described independently of any attempt.
///
/// The request is signed again for every attempt, so it holds the unsigned
/// headers and the body that every attempt sends.
#[derive(Clone)]
pub struct AwsRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    service: Service,
    operation: String,
    classifier: Arc<dyn RetryClassifier>,
}

impl AwsRequest {
    /// Create a request with an empty body.
    pub fn new(
        method: Method,
        url: Url,
        service: Service,
        operation: impl Into<String>,
        classifier: Arc<dyn RetryClassifier>,
    ) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            service,
            operation: operation.into(),
            classifier,
        }
    }

    /// A JSON 1.1 protocol call: `X-Amz-Target: <prefix>.<operation>` and a
    /// JSON body, classified with [`JsonErrorClassifier`].
    pub fn json<T: Serialize + ?Sized>(
        url: Url,
        service: Service,
        target_prefix: &str,
        operation: &str,
        body: &T,
    ) -> Result<Self> {
        let body = serde_json::to_vec(body)?;
        Self::new(
            Method::POST,
            url,
            service,
            operation,
            Arc::new(JsonErrorClassifier),
        )
        .try_header("x-amz-target", format!("{}.{}", target_prefix, operation))?
        .try_header(http::header::CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)
        .map(|request| request.body(body))
    }

    /// A Query protocol call: form-encoded `Action`, `Version` and `params`,
    /// classified with [`QueryErrorClassifier`].
    pub fn query<'a, I>(url: Url, service: Service, action: &str, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", action)
            .append_pair("Version", service.api_version())
            .extend_pairs(params)
            .finish();

        Self::new(
            Method::POST,
            url,
            service,
            action,
            Arc::new(QueryErrorClassifier),
        )
        .try_header(http::header::CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
        .map(|request| request.body(body))
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    pub fn try_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .map_err(|e| Error::HttpClient(format!("Invalid header name '{}': {}", key_str, e)))?;
        let value = value_str
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the retry classifier.
    pub fn classifier(mut self, classifier: Arc<dyn RetryClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the unsigned headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the body.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// Service the request is signed for.
    pub fn service(&self) -> Service {
        self.service
    }

    /// Operation name, used for logging.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub(crate) fn retry_classifier(&self) -> &dyn RetryClassifier {
        self.classifier.as_ref()
    }
}

impl fmt::Debug for AwsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("service", &self.service)
            .field("operation", &self.operation)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

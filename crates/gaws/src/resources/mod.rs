//! API resource endpoints
//!
//! One module per AWS service. Each resource holds the shared dispatcher
//! and translates typed calls into signed requests and back.

pub mod cloudformation;
pub mod kinesis;
pub mod sqs;

pub use cloudformation::CloudFormation;
pub use kinesis::Kinesis;
pub use sqs::Sqs;

use crate::error::{Error, Result};
use crate::http::{AwsRequest, Dispatcher};
use crate::region::Service;
use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Form parameters of a Query protocol call, in send order.
pub(crate) type QueryParams = Vec<(String, String)>;

/// Send one Query protocol action and return the raw XML body.
pub(crate) async fn invoke_query(
    dispatcher: &Dispatcher,
    service: Service,
    action: &str,
    params: &[(String, String)],
) -> Result<Bytes> {
    let url = dispatcher.endpoint(service)?;
    let request = AwsRequest::query(
        url,
        service,
        action,
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    dispatcher.send(&request).await
}

/// Decode a successful JSON response.
pub(crate) fn decode_json<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::ResponseValidation(format!("{} response: {}", operation, e)))
}

/// Decode a successful Query (XML) response.
pub(crate) fn decode_xml<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::ResponseValidation(format!("{} response: {}", operation, e)))?;
    quick_xml::de::from_str(text)
        .map_err(|e| Error::ResponseValidation(format!("{} response: {}", operation, e)))
}

/// A Query protocol list: `<Parent><member>..</member>...</Parent>`.
#[derive(Debug, Deserialize)]
pub(crate) struct Members<T> {
    #[serde(rename = "member", default = "Vec::new")]
    pub(crate) member: Vec<T>,
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self { member: Vec::new() }
    }
}

//! Kinesis Data Streams API
//!
//! Kinesis speaks the JSON 1.1 protocol: every call is a POST to the
//! regional endpoint with `X-Amz-Target: Kinesis_20131202.<Operation>`.

mod consumer;
mod record;
mod shard;
mod stream;

pub use consumer::{ConsumerOptions, RecordConsumer};
pub use record::Record;
pub use shard::{HashKeyRange, SequenceNumberRange, Shard, ShardIteratorType};
pub use stream::{GetRecordsRequest, GetRecordsResponse, PutRecordOutput, Stream, StreamDescription};

use crate::error::{Error, Result};
use crate::http::{AwsRequest, Dispatcher};
use crate::region::Service;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TARGET_PREFIX: &str = "Kinesis_20131202";

/// Send one Kinesis operation and return the raw response body.
async fn invoke<T: Serialize + ?Sized>(
    dispatcher: &Dispatcher,
    operation: &str,
    body: &T,
) -> Result<Bytes> {
    let url = dispatcher.endpoint(Service::Kinesis)?;
    let request = AwsRequest::json(url, Service::Kinesis, TARGET_PREFIX, operation, body)?;
    dispatcher.send(&request).await
}

/// Kinesis API resource.
#[derive(Debug, Clone)]
pub struct Kinesis {
    dispatcher: Arc<Dispatcher>,
}

impl Kinesis {
    /// Create a new Kinesis resource.
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Create a stream with `shard_count` shards.
    ///
    /// The stream starts in `CREATING` status; use [`Stream::describe`] to
    /// wait for `ACTIVE`.
    #[tracing::instrument(skip(self))]
    pub async fn create_stream(&self, name: &str, shard_count: u32) -> Result<Stream> {
        if shard_count == 0 {
            return Err(Error::InvalidRequest(
                "shard_count must be at least 1".to_string(),
            ));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct CreateStreamRequest<'a> {
            shard_count: u32,
            stream_name: &'a str,
        }

        invoke(
            &self.dispatcher,
            "CreateStream",
            &CreateStreamRequest {
                shard_count,
                stream_name: name,
            },
        )
        .await?;

        Ok(self.stream(name))
    }

    /// List the streams in the account.
    ///
    /// Only the first page is returned.
    #[tracing::instrument(skip(self))]
    pub async fn list_streams(&self) -> Result<Vec<Stream>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct ListStreamsResponse {
            #[serde(default)]
            stream_names: Vec<String>,
        }

        let body = invoke(&self.dispatcher, "ListStreams", &serde_json::json!({})).await?;
        let response: ListStreamsResponse = super::decode_json("ListStreams", &body)?;

        Ok(response
            .stream_names
            .into_iter()
            .map(|name| self.stream(name))
            .collect())
    }

    /// A handle to an existing stream. Sends no request.
    pub fn stream(&self, name: impl Into<String>) -> Stream {
        Stream::new(name.into(), Arc::clone(&self.dispatcher))
    }
}

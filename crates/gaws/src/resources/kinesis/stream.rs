use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Record, Shard, invoke};
use crate::error::Result;
use crate::http::Dispatcher;
use crate::resources::decode_json;

/// A handle to one Kinesis stream.
///
/// Cheap to clone. Holding a `Stream` does not mean the stream exists.
#[derive(Debug, Clone)]
pub struct Stream {
    name: String,
    dispatcher: Arc<Dispatcher>,
}

/// Result of [`Stream::put_record`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordOutput {
    /// Shard the record landed in
    pub shard_id: String,
    /// Sequence number assigned to the record
    pub sequence_number: String,
    /// Server-side encryption type, when the stream is encrypted
    #[serde(default)]
    pub encryption_type: Option<String>,
}

/// Result of [`Stream::describe`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamDescription {
    /// Stream name
    pub stream_name: String,
    /// Stream ARN
    #[serde(rename = "StreamARN")]
    pub stream_arn: String,
    /// `CREATING`, `DELETING`, `ACTIVE` or `UPDATING`
    pub stream_status: String,
    /// Shards of the stream
    #[serde(default)]
    pub shards: Vec<Shard>,
    /// Whether more shards are available than were returned
    #[serde(default)]
    pub has_more_shards: bool,
    /// Retention period in hours
    #[serde(default)]
    pub retention_period_hours: Option<u32>,
    /// Creation time, in epoch seconds
    #[serde(default)]
    pub stream_creation_timestamp: Option<f64>,
}

impl StreamDescription {
    /// Whether the stream accepts reads and writes.
    pub fn is_active(&self) -> bool {
        self.stream_status == "ACTIVE"
    }
}

/// Parameters of [`Stream::get_records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRecordsRequest {
    /// Position to read from
    pub shard_iterator: String,
    /// Maximum number of records to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl GetRecordsRequest {
    /// Read from `shard_iterator` with the service default limit.
    pub fn new(shard_iterator: impl Into<String>) -> Self {
        Self {
            shard_iterator: shard_iterator.into(),
            limit: None,
        }
    }

    /// Set the maximum number of records to return.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of [`Stream::get_records`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRecordsResponse {
    /// Records read, possibly none
    #[serde(default)]
    pub records: Vec<Record>,
    /// Where to read next. `None` once the shard is closed and drained.
    #[serde(default)]
    pub next_shard_iterator: Option<String>,
    /// How far behind the tip of the stream this read is
    #[serde(default)]
    pub millis_behind_latest: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StreamNameBody<'a> {
    stream_name: &'a str,
}

impl Stream {
    pub(crate) fn new(name: String, dispatcher: Arc<Dispatcher>) -> Self {
        Self { name, dispatcher }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Write one record. `data` is sent base64 encoded.
    #[tracing::instrument(skip(self, data), fields(stream = %self.name, size = data.len()))]
    pub async fn put_record(&self, partition_key: &str, data: &[u8]) -> Result<PutRecordOutput> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct PutRecordRequest<'a> {
            data: String,
            partition_key: &'a str,
            stream_name: &'a str,
        }

        let request = PutRecordRequest {
            data: STANDARD.encode(data),
            partition_key,
            stream_name: &self.name,
        };

        let body = invoke(&self.dispatcher, "PutRecord", &request).await?;
        decode_json("PutRecord", &body)
    }

    /// Delete the stream.
    #[tracing::instrument(skip(self), fields(stream = %self.name))]
    pub async fn delete(&self) -> Result<()> {
        invoke(
            &self.dispatcher,
            "DeleteStream",
            &StreamNameBody {
                stream_name: &self.name,
            },
        )
        .await?;
        Ok(())
    }

    /// Describe the stream and its shards.
    #[tracing::instrument(skip(self), fields(stream = %self.name))]
    pub async fn describe(&self) -> Result<StreamDescription> {
        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct DescribeStreamResponse {
            stream_description: StreamDescription,
        }

        let body = invoke(
            &self.dispatcher,
            "DescribeStream",
            &StreamNameBody {
                stream_name: &self.name,
            },
        )
        .await?;
        let response: DescribeStreamResponse = decode_json("DescribeStream", &body)?;
        Ok(response.stream_description)
    }

    /// Read a batch of records from a shard iterator.
    #[tracing::instrument(skip(self, request), fields(stream = %self.name, limit = ?request.limit))]
    pub async fn get_records(&self, request: &GetRecordsRequest) -> Result<GetRecordsResponse> {
        let body = invoke(&self.dispatcher, "GetRecords", request).await?;
        decode_json("GetRecords", &body)
    }

    /// Merge two adjacent shards into one.
    #[tracing::instrument(skip(self), fields(stream = %self.name))]
    pub async fn merge_shards(&self, shard: &str, adjacent_shard: &str) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct MergeShardsRequest<'a> {
            adjacent_shard_to_merge: &'a str,
            shard_to_merge: &'a str,
            stream_name: &'a str,
        }

        invoke(
            &self.dispatcher,
            "MergeShards",
            &MergeShardsRequest {
                adjacent_shard_to_merge: adjacent_shard,
                shard_to_merge: shard,
                stream_name: &self.name,
            },
        )
        .await?;
        Ok(())
    }

    /// Split `shard` in two at `new_starting_hash_key`.
    #[tracing::instrument(skip(self), fields(stream = %self.name))]
    pub async fn split_shard(&self, shard: &str, new_starting_hash_key: &str) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct SplitShardRequest<'a> {
            new_starting_hash_key: &'a str,
            shard_to_split: &'a str,
            stream_name: &'a str,
        }

        invoke(
            &self.dispatcher,
            "SplitShard",
            &SplitShardRequest {
                new_starting_hash_key,
                shard_to_split: shard,
                stream_name: &self.name,
            },
        )
        .await?;
        Ok(())
    }
}

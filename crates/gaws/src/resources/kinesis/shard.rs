use serde::{Deserialize, Serialize};

use super::{Stream, invoke};
use crate::error::{Error, Result};

/// A shard of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shard {
    /// Shard identifier, e.g. `shardId-000000000000`
    pub shard_id: String,
    /// Parent shard, when this shard came from a split or merge
    #[serde(default)]
    pub parent_shard_id: Option<String>,
    /// Second parent, when this shard came from a merge
    #[serde(default)]
    pub adjacent_parent_shard_id: Option<String>,
    /// Range of hash keys routed to this shard
    pub hash_key_range: HashKeyRange,
    /// Range of sequence numbers assigned in this shard
    pub sequence_number_range: SequenceNumberRange,
}

impl Shard {
    /// Whether the shard is closed to new records.
    pub fn is_closed(&self) -> bool {
        self.sequence_number_range.ending_sequence_number.is_some()
    }
}

/// Inclusive range of hash keys, as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HashKeyRange {
    /// First hash key
    pub starting_hash_key: String,
    /// Last hash key
    pub ending_hash_key: String,
}

/// Range of sequence numbers. Open shards have no ending sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SequenceNumberRange {
    /// First sequence number
    pub starting_sequence_number: String,
    /// Last sequence number, once the shard is closed
    #[serde(default)]
    pub ending_sequence_number: Option<String>,
}

/// Where a shard iterator starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShardIteratorType {
    /// At the given sequence number
    AtSequenceNumber,
    /// Right after the given sequence number
    AfterSequenceNumber,
    /// At the oldest record in the shard
    TrimHorizon,
    /// After the most recent record
    Latest,
}

impl ShardIteratorType {
    fn needs_sequence_number(self) -> bool {
        matches!(
            self,
            ShardIteratorType::AtSequenceNumber | ShardIteratorType::AfterSequenceNumber
        )
    }
}

impl Stream {
    /// Get an iterator for reading `shard_id`.
    ///
    /// `starting_sequence_number` is required for
    /// [`AtSequenceNumber`](ShardIteratorType::AtSequenceNumber) and
    /// [`AfterSequenceNumber`](ShardIteratorType::AfterSequenceNumber), and
    /// ignored otherwise.
    #[tracing::instrument(skip(self), fields(stream = %self.name()))]
    pub async fn get_shard_iterator(
        &self,
        shard_id: &str,
        iterator_type: ShardIteratorType,
        starting_sequence_number: Option<&str>,
    ) -> Result<String> {
        if iterator_type.needs_sequence_number() && starting_sequence_number.is_none() {
            return Err(Error::InvalidRequest(format!(
                "{:?} requires a starting sequence number",
                iterator_type
            )));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct GetShardIteratorRequest<'a> {
            shard_id: &'a str,
            shard_iterator_type: ShardIteratorType,
            #[serde(skip_serializing_if = "Option::is_none")]
            starting_sequence_number: Option<&'a str>,
            stream_name: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct GetShardIteratorResponse {
            shard_iterator: String,
        }

        let request = GetShardIteratorRequest {
            shard_id,
            shard_iterator_type: iterator_type,
            starting_sequence_number: starting_sequence_number
                .filter(|_| iterator_type.needs_sequence_number()),
            stream_name: self.name(),
        };

        let body = invoke(self.dispatcher(), "GetShardIterator", &request).await?;
        let response: GetShardIteratorResponse =
            crate::resources::decode_json("GetShardIterator", &body)?;
        Ok(response.shard_iterator)
    }
}

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::error::Result;

/// A data record read from a stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// The data blob, base64 encoded as sent on the wire
    pub data: String,
    /// Identifies which shard in the stream the record is assigned to
    pub partition_key: String,
    /// Unique identifier of the record within its shard
    pub sequence_number: String,
    /// When the record was inserted, in epoch seconds
    #[serde(default)]
    pub approximate_arrival_timestamp: Option<f64>,
    /// Server-side encryption type, when the stream is encrypted
    #[serde(default)]
    pub encryption_type: Option<String>,
}

impl Record {
    /// Decode the record payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if the data is not valid base64.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.data)?)
    }
}

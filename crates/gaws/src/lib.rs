//! # gaws
//!
//! Minimal async clients for a few AWS services:
//! - Kinesis Data Streams (JSON 1.1 protocol), with a background record consumer
//! - CloudFormation template validation (Query protocol)
//! - Simple Queue Service (Query protocol)
//!
//! Every request is signed with SigV4 and retried with exponential backoff
//! while the service answers with a server error or a throttling error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gaws::Client;
//! use gaws::resources::kinesis::{ConsumerOptions, ShardIteratorType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?;
//!
//!     let stream = client.kinesis().stream("events");
//!     stream.put_record("user-42", b"hello").await?;
//!
//!     let description = stream.describe().await?;
//!     let shard = &description.shards[0];
//!     let iterator = stream
//!         .get_shard_iterator(&shard.shard_id, ShardIteratorType::TrimHorizon, None)
//!         .await?;
//!
//!     let mut consumer = stream.consume(iterator, ConsumerOptions::default());
//!     while let Some(record) = consumer.recv().await {
//!         println!("{}", String::from_utf8_lossy(&record.bytes()?));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, RetryConfig};
pub use credentials::Credentials;
pub use error::{Error, Result, ServiceError};
pub use http::AwsRequest;
pub use region::{Region, Service};

// Module declarations
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod observability;
pub mod region;
pub mod resources;
pub mod signing;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use gaws::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Credentials, Error, Result, ServiceError,
        resources::cloudformation::{TemplateValidation, ValidateTemplateRequest},
        resources::kinesis::{ConsumerOptions, Record, RecordConsumer, ShardIteratorType, Stream},
        resources::sqs::{Message, Queue, ReceiveMessageRequest},
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

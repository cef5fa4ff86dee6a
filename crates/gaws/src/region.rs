//! AWS regions and service endpoints

use crate::error::{Error, Result};
use std::fmt;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Regions the clients know how to reach.
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "ca-central-1",
    "sa-east-1",
    "eu-central-1",
    "eu-north-1",
    "eu-south-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "af-south-1",
    "me-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "cn-north-1",
    "cn-northwest-1",
];

/// The AWS services the clients talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Amazon Kinesis Data Streams (JSON 1.1 protocol)
    Kinesis,
    /// AWS CloudFormation (Query protocol)
    CloudFormation,
    /// Amazon Simple Queue Service (Query protocol)
    Sqs,
}

impl Service {
    /// Name used both as endpoint prefix and in the SigV4 credential scope.
    pub fn signing_name(self) -> &'static str {
        match self {
            Service::Kinesis => "kinesis",
            Service::CloudFormation => "cloudformation",
            Service::Sqs => "sqs",
        }
    }

    /// API version string.
    pub fn api_version(self) -> &'static str {
        match self {
            Service::Kinesis => "20131202",
            Service::CloudFormation => "2010-05-15",
            Service::Sqs => "2012-11-05",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signing_name())
    }
}

/// A validated AWS region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    name: String,
}

impl Region {
    /// Look up a region in [`KNOWN_REGIONS`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRegion`] for names outside the table.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if KNOWN_REGIONS.contains(&name.as_str()) {
            Ok(Self { name })
        } else {
            Err(Error::UnknownRegion(name))
        }
    }

    /// Accept any region name. Used when an endpoint override makes the
    /// region meaningful only for the signature scope.
    pub fn custom(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Region name, e.g. `us-east-1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public HTTPS endpoint of `service` in this region.
    pub fn endpoint(&self, service: Service) -> String {
        let suffix = if self.name.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        format!("https://{}.{}.{}", service.signing_name(), self.name, suffix)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::custom(DEFAULT_REGION)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

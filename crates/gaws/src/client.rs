//! Main client implementation

use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::{
    config::{ClientConfig, ClientConfigBuilder, RetryConfig},
    credentials::Credentials,
    error::{Error, Result},
    http::{AwsRequest, Dispatcher},
    region::{Region, Service},
    resources::{CloudFormation, Kinesis, Sqs},
    signing::Signer,
};

/// Main client for the supported AWS services.
///
/// Cloning is cheap: clones share the connection pool, the configuration
/// and the service resources.
///
/// # Example
///
/// ```rust,no_run
/// use gaws::{Client, Credentials};
///
/// let client = Client::builder()
///     .credentials(Credentials::new("AKID...", "secret"))
///     .region("eu-west-1")
///     .build()?;
/// let kinesis = client.kinesis();
/// # Ok::<(), gaws::Error>(())
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    dispatcher: Arc<Dispatcher>,

    // Lazy-initialized resources
    kinesis: OnceLock<Kinesis>,
    cloudformation: OnceLock<CloudFormation>,
    sqs: OnceLock<Sqs>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("region", &self.region().name())
            .field("endpoint", &self.inner.dispatcher.endpoint_override().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client configured from the environment.
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env())
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no credentials are configured
    /// - the region is unknown and no endpoint override is set
    /// - the endpoint override is empty or not an `http`/`https` URL
    /// - the HTTP client cannot be built
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let credentials = config.credentials.ok_or_else(|| {
            Error::MissingConfig(
                "No AWS credentials provided. Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY or provide credentials explicitly.".to_string(),
            )
        })?;

        let endpoint_url = config
            .endpoint_url
            .as_deref()
            .map(parse_endpoint)
            .transpose()?;

        let region = match endpoint_url {
            Some(_) => Region::custom(config.region),
            None => Region::new(config.region)?,
        };

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("gaws-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let signer = Signer::new(credentials, region.name());
        let dispatcher = Dispatcher::new(
            http_client,
            signer,
            config.retry.backoff(),
            region,
            endpoint_url,
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                dispatcher: Arc::new(dispatcher),
                kinesis: OnceLock::new(),
                cloudformation: OnceLock::new(),
                sqs: OnceLock::new(),
            }),
        })
    }

    /// Access the Kinesis API.
    pub fn kinesis(&self) -> &Kinesis {
        self.inner
            .kinesis
            .get_or_init(|| Kinesis::new(Arc::clone(&self.inner.dispatcher)))
    }

    /// Access the CloudFormation API.
    pub fn cloudformation(&self) -> &CloudFormation {
        self.inner
            .cloudformation
            .get_or_init(|| CloudFormation::new(Arc::clone(&self.inner.dispatcher)))
    }

    /// Access the SQS API.
    pub fn sqs(&self) -> &Sqs {
        self.inner
            .sqs
            .get_or_init(|| Sqs::new(Arc::clone(&self.inner.dispatcher)))
    }

    /// Send a hand-built request through the signing and retry pipeline.
    ///
    /// Useful for operations the typed resources do not cover.
    pub async fn send(&self, request: &AwsRequest) -> Result<Bytes> {
        self.inner.dispatcher.send(request).await
    }

    /// Endpoint requests for `service` are sent to.
    pub fn endpoint(&self, service: Service) -> Result<Url> {
        self.inner.dispatcher.endpoint(service)
    }

    /// The region requests are signed for.
    pub fn region(&self) -> &Region {
        self.inner.dispatcher.region()
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(Error::InvalidUrl("Endpoint URL cannot be empty".to_string()));
    }

    let url: Url = endpoint
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!(
            "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
            scheme
        ))),
    }
}

/// Builder for creating a configured Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Set the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config = self.config.credentials(credentials);
        self
    }

    /// Set the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config = self.config.region(region);
        self
    }

    /// Send every request to this endpoint instead of the public AWS one.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.config = self.config.endpoint_url(endpoint_url);
        self
    }

    /// Set the timeout for a single HTTP attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the number of attempts per request.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config = self.config.max_attempts(max_attempts);
        self
    }

    /// Replace the whole retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config = self.config.retry(retry);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config.build())
    }
}

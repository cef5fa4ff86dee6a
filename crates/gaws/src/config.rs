//! Configuration for the gaws client

use crate::credentials::Credentials;
use crate::region::DEFAULT_REGION;
use gaws_core::retry::ExponentialBackoff;
use std::time::Duration;

/// Retry behaviour for every request a client sends.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Base delay; the wait after attempt `n` is `initial_delay * 2^n`
    pub initial_delay: Duration,

    /// Upper bound on a single wait
    pub max_delay: Duration,

    /// Jitter factor in `[0.0, 1.0]`; `0.0` makes delays deterministic
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: ExponentialBackoff::DEFAULT_MAX_ATTEMPTS,
            initial_delay: ExponentialBackoff::DEFAULT_INITIAL_DELAY,
            max_delay: ExponentialBackoff::DEFAULT_MAX_DELAY,
            jitter: 0.0,
        }
    }
}

impl RetryConfig {
    pub(crate) fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .max_attempts(self.max_attempts)
            .initial_delay(self.initial_delay)
            .max_delay(self.max_delay)
            .jitter(self.jitter)
            .build()
    }
}

/// Configuration for the gaws client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credentials used to sign every request
    pub credentials: Option<Credentials>,

    /// Region name
    pub region: String,

    /// Endpoint override used for every service (LocalStack, tests)
    pub endpoint_url: Option<String>,

    /// Timeout for a single HTTP attempt
    pub timeout: Duration,

    /// Retry behaviour
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with static credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, without
    /// overriding variables that are already set. This will look for:
    /// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` for credentials
    /// - `AWS_REGION`, then `AWS_DEFAULT_REGION` for the region
    /// - `GAWS_ENDPOINT_URL` for an endpoint override
    /// - `GAWS_TIMEOUT` for the request timeout (in seconds)
    /// - `GAWS_MAX_TRIES` for the number of attempts per request
    #[cfg(feature = "env")]
    pub fn from_env() -> Self {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self {
            credentials: Credentials::from_env(),
            ..Default::default()
        };

        // Region
        if let Ok(region) = env::var("AWS_REGION").or_else(|_| env::var("AWS_DEFAULT_REGION"))
            && !region.is_empty()
        {
            config.region = region;
        }

        // Endpoint override
        if let Ok(endpoint_url) = env::var("GAWS_ENDPOINT_URL") {
            config.endpoint_url = Some(endpoint_url);
        }

        // Timeout
        if let Ok(timeout_str) = env::var("GAWS_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        // Attempts
        if let Ok(max_tries_str) = env::var("GAWS_MAX_TRIES")
            && let Ok(max_tries) = max_tries_str.parse::<u32>()
        {
            config.retry.max_attempts = max_tries;
        }

        config
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Set the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    /// Send every request to this endpoint instead of the public AWS one.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.config.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the timeout for a single HTTP attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of attempts per request.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.retry.max_attempts = max_attempts;
        self
    }

    /// Replace the whole retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

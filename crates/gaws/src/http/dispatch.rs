//! Signed sending with retries

use super::classify::Verdict;
use super::request::AwsRequest;
use crate::error::{Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use crate::region::{Region, Service};
use crate::signing::Signer;
use bytes::Bytes;
use chrono::Utc;
use gaws_core::retry::{Attempt, BackoffStrategy, ExponentialBackoff};
use http::HeaderValue;
use url::Url;

/// Sends [`AwsRequest`]s: signs each attempt, classifies each response and
/// retries transient failures with exponential backoff.
///
/// Attempts of one call are strictly sequential.
#[derive(Debug)]
pub struct Dispatcher {
    http_client: reqwest::Client,
    signer: Signer,
    backoff: ExponentialBackoff,
    region: Region,
    endpoint_url: Option<Url>,
}

impl Dispatcher {
    pub(crate) fn new(
        http_client: reqwest::Client,
        signer: Signer,
        backoff: ExponentialBackoff,
        region: Region,
        endpoint_url: Option<Url>,
    ) -> Self {
        Self {
            http_client,
            signer,
            backoff,
            region,
            endpoint_url,
        }
    }

    /// Endpoint for `service`: the configured override, or the public
    /// regional endpoint.
    pub fn endpoint(&self, service: Service) -> Result<Url> {
        match &self.endpoint_url {
            Some(url) => Ok(url.clone()),
            None => {
                let endpoint = self.region.endpoint(service);
                Url::parse(&endpoint).map_err(|e| Error::InvalidUrl(format!("{}: {}", endpoint, e)))
            }
        }
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// The configured endpoint override, if any.
    pub fn endpoint_override(&self) -> Option<&Url> {
        self.endpoint_url.as_ref()
    }

    /// Send `request` until it succeeds, fails permanently, or the attempt
    /// budget is spent.
    ///
    /// Returns the raw body of the successful response. Transport errors
    /// are returned at once, without retry. When every attempt failed
    /// transiently the result is [`Error::ExceededMaxRetries`].
    pub async fn send(&self, request: &AwsRequest) -> Result<Bytes> {
        let metadata = RequestMetadata::new(request.service().signing_name(), request.operation())
            .with_body_size(request.body_bytes().len());
        let timer = RequestTimer::start();

        let outcome = self
            .backoff
            .execute(|attempt| {
                let metadata = &metadata;
                async move { self.attempt(request, metadata, attempt).await }
            })
            .await;

        match outcome {
            Ok((attempts, status, body)) => {
                ResponseMetadata::new(timer.elapsed())
                    .with_status(status)
                    .with_body_size(body.len())
                    .with_attempts(attempts)
                    .log_success(&metadata);
                Ok(body)
            }
            Err(failure) => {
                let (attempts, error) = failure.into_inner();
                let mut response = ResponseMetadata::new(timer.elapsed()).with_attempts(attempts);
                if let Some(service_error) = error.service_error() {
                    response = response.with_status(service_error.status);
                }
                response.log_error(&metadata, &error.to_string());
                Err(error)
            }
        }
    }

    /// One attempt. Errors are tagged with the attempt number that
    /// produced them.
    async fn attempt(
        &self,
        request: &AwsRequest,
        metadata: &RequestMetadata,
        attempt: u32,
    ) -> Attempt<(u32, u16, Bytes), (u32, Error)> {
        metadata.log_attempt(attempt);

        let (status, body) = match self.send_once(request).await {
            Ok(response) => response,
            Err(e) => return Attempt::Done(Err((attempt, e))),
        };

        match request.retry_classifier().classify(status, &body) {
            Verdict::Success => Attempt::Done(Ok((attempt, status, body))),
            Verdict::Fail(e) => Attempt::Done(Err((attempt, e))),
            Verdict::Retry(last_error) => {
                metadata.log_retry(attempt, status, &last_error.error_type);
                // Reported as-is if this was the last attempt
                Attempt::Retry((
                    attempt,
                    Error::ExceededMaxRetries {
                        attempts: attempt,
                        last_error,
                        body,
                    },
                ))
            }
        }
    }

    /// One signed HTTP exchange. Returns status and full body.
    async fn send_once(&self, request: &AwsRequest) -> Result<(u16, Bytes)> {
        let url = request.url();
        let mut headers = request.headers().clone();
        headers.insert(http::header::HOST, host_header(url)?);

        self.signer.sign(
            request.service().signing_name(),
            request.method(),
            url,
            &mut headers,
            request.body_bytes(),
            Utc::now(),
        )?;

        let response = self
            .http_client
            .request(request.method().clone(), url.clone())
            .headers(headers)
            .body(request.body_bytes().clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body))
    }
}

/// `host[:port]`, with the port only when it is not the scheme default.
fn host_header(url: &Url) -> Result<HeaderValue> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(format!("{} has no host", url)))?;
    let value = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).map_err(|_| Error::InvalidHeaderValue(value))
}

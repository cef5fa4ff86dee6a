//! Common test utilities and helpers

use std::time::Duration;

use gaws::{Client, Credentials, RetryConfig};
use wiremock::MockServer;

/// Install a subscriber once so `RUST_LOG=gaws=debug` shows client logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Credentials from the AWS documentation examples
#[allow(dead_code)]
pub fn test_credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
}

/// A client that sends everything to `server`, with the default attempt budget
#[allow(dead_code)]
pub fn client(server: &MockServer) -> Client {
    client_with_attempts(server, 5)
}

/// A client that sends everything to `server` and retries almost without delay
#[allow(dead_code)]
pub fn client_with_attempts(server: &MockServer, max_attempts: u32) -> Client {
    init_tracing();
    Client::builder()
        .credentials(test_credentials())
        .region("us-east-1")
        .endpoint_url(server.uri())
        .retry(RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: 0.0,
        })
        .build()
        .expect("Failed to build client")
}

/// `X-Amz-Target` value for a Kinesis operation
#[allow(dead_code)]
pub fn kinesis_target(operation: &str) -> String {
    format!("Kinesis_20131202.{}", operation)
}

/// A JSON 1.1 error document
#[allow(dead_code)]
pub fn json_error(error_type: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "__type": error_type, "message": message })
}

/// A Query protocol error document
#[allow(dead_code)]
pub fn query_error(code: &str, message: &str) -> String {
    format!(
        "<ErrorResponse><Error><Type>Sender</Type><Code>{}</Code><Message>{}</Message></Error>\
         <RequestId>b25f48e8-84fd-11e6-80d9-574e0c4664cb</RequestId></ErrorResponse>",
        code, message
    )
}

//! CloudFormation template validation against a mock server

mod common;

use assert_matches::assert_matches;
use gaws::Error;
use gaws::resources::cloudformation::ValidateTemplateRequest;
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATE: &str = r#"{"Parameters":{"QueueName":{"Type":"String","Default":"jobs"}}}"#;

fn validate_template() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded; charset=utf-8",
        ))
        .and(body_string_contains("Action=ValidateTemplate"))
        .and(body_string_contains("Version=2010-05-15"))
}

#[tokio::test]
async fn test_validate_template_body() {
    let server = MockServer::start().await;
    validate_template()
        .and(body_string_contains("TemplateBody="))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ValidateTemplateResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <ValidateTemplateResult>
    <Parameters>
      <member>
        <NoEcho>false</NoEcho>
        <ParameterKey>QueueName</ParameterKey>
        <DefaultValue>jobs</DefaultValue>
      </member>
    </Parameters>
  </ValidateTemplateResult>
  <ResponseMetadata><RequestId>0be7b6e8-e4a0-11e0-a5bd-9f8d5a7dbc91</RequestId></ResponseMetadata>
</ValidateTemplateResponse>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let validation = common::client(&server)
        .cloudformation()
        .validate_template(ValidateTemplateRequest::body(TEMPLATE))
        .await
        .unwrap();

    assert_eq!(validation.parameters.len(), 1);
    assert_eq!(validation.parameters[0].parameter_key, "QueueName");
    assert_eq!(validation.parameters[0].default_value.as_deref(), Some("jobs"));
    assert!(!validation.parameters[0].no_echo);
    assert!(validation.capabilities.is_empty());
}

#[tokio::test]
async fn test_validate_template_url() {
    let server = MockServer::start().await;
    validate_template()
        .and(body_string_contains(
            "TemplateURL=https%3A%2F%2Fs3.amazonaws.com%2Fbucket%2Ftemplate.json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<ValidateTemplateResponse><ValidateTemplateResult>\
             <Description>From S3</Description>\
             </ValidateTemplateResult></ValidateTemplateResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let validation = common::client(&server)
        .cloudformation()
        .validate_template(ValidateTemplateRequest::url(
            "https://s3.amazonaws.com/bucket/template.json",
        ))
        .await
        .unwrap();
    assert_eq!(validation.description.as_deref(), Some("From S3"));
}

#[tokio::test]
async fn test_both_sources_rejected_without_request() {
    let server = MockServer::start().await;
    validate_template()
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = ValidateTemplateRequest {
        template_body: Some(TEMPLATE.to_string()),
        template_url: Some("https://s3.amazonaws.com/bucket/template.json".to_string()),
    };
    let err = common::client(&server)
        .cloudformation()
        .validate_template(request)
        .await
        .unwrap_err();
    assert_matches!(err, Error::InvalidRequest(_));

    let err = common::client(&server)
        .cloudformation()
        .validate_template(ValidateTemplateRequest::default())
        .await
        .unwrap_err();
    assert_matches!(err, Error::InvalidRequest(_));
}

#[tokio::test]
async fn test_validation_error() {
    let server = MockServer::start().await;
    validate_template()
        .respond_with(ResponseTemplate::new(400).set_body_string(common::query_error(
            "ValidationError",
            "Template format error: JSON not well-formed.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = common::client(&server)
        .cloudformation()
        .validate_template(ValidateTemplateRequest::body("{"))
        .await
        .unwrap_err();

    let service_error = err.service_error().unwrap();
    assert_eq!(service_error.error_type, "ValidationError");
    assert_eq!(
        service_error.request_id.as_deref(),
        Some("b25f48e8-84fd-11e6-80d9-574e0c4664cb")
    );
}

#[tokio::test]
async fn test_query_throttling_is_retried() {
    let server = MockServer::start().await;
    validate_template()
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(common::query_error("Throttling", "Rate exceeded")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let err = common::client_with_attempts(&server, 2)
        .cloudformation()
        .validate_template(ValidateTemplateRequest::body(TEMPLATE))
        .await
        .unwrap_err();
    assert_matches!(err, Error::ExceededMaxRetries { attempts: 2, .. });
}

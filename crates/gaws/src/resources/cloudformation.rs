//! CloudFormation API
//!
//! Only template validation is covered.

use serde::Deserialize;
use std::sync::Arc;

use super::{Members, QueryParams, decode_xml, invoke_query};
use crate::error::{Error, Result};
use crate::http::Dispatcher;
use crate::region::Service;

/// CloudFormation API resource.
#[derive(Debug, Clone)]
pub struct CloudFormation {
    dispatcher: Arc<Dispatcher>,
}

/// Template to validate: exactly one of a body or an S3 URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateTemplateRequest {
    /// Template document, JSON or YAML
    pub template_body: Option<String>,
    /// Location of the template in S3
    pub template_url: Option<String>,
}

impl ValidateTemplateRequest {
    /// Validate an inline template.
    pub fn body(template_body: impl Into<String>) -> Self {
        Self {
            template_body: Some(template_body.into()),
            template_url: None,
        }
    }

    /// Validate a template stored in S3.
    pub fn url(template_url: impl Into<String>) -> Self {
        Self {
            template_body: None,
            template_url: Some(template_url.into()),
        }
    }

    fn into_params(self) -> Result<QueryParams> {
        match (self.template_body, self.template_url) {
            (Some(body), None) => Ok(vec![("TemplateBody".to_string(), body)]),
            (None, Some(url)) => Ok(vec![("TemplateURL".to_string(), url)]),
            (Some(_), Some(_)) => Err(Error::InvalidRequest(
                "set either template_body or template_url, not both".to_string(),
            )),
            (None, None) => Err(Error::InvalidRequest(
                "one of template_body or template_url is required".to_string(),
            )),
        }
    }
}

/// A parameter declared by a template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateParameter {
    /// Parameter name
    pub parameter_key: String,
    /// Default value, if the template declares one
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether the value is masked in stack descriptions
    #[serde(default)]
    pub no_echo: bool,
    /// Parameter description
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of [`CloudFormation::validate_template`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValidation {
    /// Declared parameters
    pub parameters: Vec<TemplateParameter>,
    /// Template description
    pub description: Option<String>,
    /// Capabilities needed to create a stack from the template
    pub capabilities: Vec<String>,
    /// Why the capabilities are needed
    pub capabilities_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ValidateTemplateResponse {
    validate_template_result: ValidateTemplateResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ValidateTemplateResult {
    #[serde(default)]
    parameters: Members<TemplateParameter>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    capabilities: Members<String>,
    #[serde(default)]
    capabilities_reason: Option<String>,
}

impl From<ValidateTemplateResult> for TemplateValidation {
    fn from(result: ValidateTemplateResult) -> Self {
        Self {
            parameters: result.parameters.member,
            description: result.description,
            capabilities: result.capabilities.member,
            capabilities_reason: result.capabilities_reason,
        }
    }
}

impl CloudFormation {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Validate a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without sending anything unless
    /// exactly one of the body or URL is set.
    #[tracing::instrument(skip(self, request))]
    pub async fn validate_template(
        &self,
        request: ValidateTemplateRequest,
    ) -> Result<TemplateValidation> {
        let params = request.into_params()?;
        let body = invoke_query(
            &self.dispatcher,
            Service::CloudFormation,
            "ValidateTemplate",
            &params,
        )
        .await?;
        parse_validate_template(&body)
    }
}

fn parse_validate_template(body: &[u8]) -> Result<TemplateValidation> {
    let response: ValidateTemplateResponse = decode_xml("ValidateTemplate", body)?;
    Ok(response.validate_template_result.into())
}

//! Simple Queue Service API
//!
//! Queue calls go to the regional endpoint with the queue URL as the
//! `QueueUrl` parameter, so an endpoint override applies to them too.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::{QueryParams, decode_xml, invoke_query};
use crate::error::Result;
use crate::http::Dispatcher;
use crate::region::Service;

/// SQS API resource.
#[derive(Debug, Clone)]
pub struct Sqs {
    dispatcher: Arc<Dispatcher>,
}

/// A handle to one queue, addressed by URL.
#[derive(Debug, Clone)]
pub struct Queue {
    url: String,
    dispatcher: Arc<Dispatcher>,
}

/// Result of [`Queue::send_message`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendMessageOutput {
    /// Identifier assigned to the message
    #[serde(rename = "MessageId")]
    pub message_id: String,
    /// MD5 digest of the message body, for integrity checks
    #[serde(rename = "MD5OfMessageBody", default)]
    pub md5_of_message_body: Option<String>,
}

/// A message received from a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier of the message
    pub message_id: String,
    /// Handle for deleting this receipt of the message
    pub receipt_handle: String,
    /// MD5 digest of the body
    pub md5_of_body: Option<String>,
    /// Message contents
    pub body: String,
    /// System attributes that were requested
    pub attributes: HashMap<String, String>,
}

/// Parameters of [`Queue::receive_messages`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveMessageRequest {
    /// Up to 10 messages. `None` receives one.
    pub max_number_of_messages: Option<u32>,
    /// Seconds the messages stay hidden from other receivers
    pub visibility_timeout: Option<u32>,
    /// Long-poll duration in seconds
    pub wait_time_seconds: Option<u32>,
    /// System attributes to return with each message
    pub attribute_names: Vec<String>,
}

impl ReceiveMessageRequest {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(max) = self.max_number_of_messages {
            params.push(("MaxNumberOfMessages".to_string(), max.to_string()));
        }
        if let Some(timeout) = self.visibility_timeout {
            params.push(("VisibilityTimeout".to_string(), timeout.to_string()));
        }
        if let Some(wait) = self.wait_time_seconds {
            params.push(("WaitTimeSeconds".to_string(), wait.to_string()));
        }
        params.extend(indexed("AttributeName", &self.attribute_names));
        params
    }
}

/// `Prefix.1=a&Prefix.2=b...`
fn indexed<'a>(prefix: &'a str, values: &'a [String]) -> impl Iterator<Item = (String, String)> + 'a {
    values
        .iter()
        .enumerate()
        .map(move |(i, value)| (format!("{}.{}", prefix, i + 1), value.clone()))
}

#[derive(Debug, Deserialize)]
struct Attribute {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value", default)]
    value: String,
}

fn attribute_map(attributes: Vec<Attribute>) -> HashMap<String, String> {
    attributes.into_iter().map(|a| (a.name, a.value)).collect()
}

#[derive(Deserialize)]
struct QueueUrlResult {
    #[serde(rename = "QueueUrl")]
    queue_url: String,
}

#[derive(Deserialize)]
struct CreateQueueResponse {
    #[serde(rename = "CreateQueueResult")]
    result: QueueUrlResult,
}

#[derive(Deserialize)]
struct GetQueueUrlResponse {
    #[serde(rename = "GetQueueUrlResult")]
    result: QueueUrlResult,
}

#[derive(Deserialize)]
struct ListQueuesResponse {
    #[serde(rename = "ListQueuesResult", default)]
    result: ListQueuesResult,
}

#[derive(Default, Deserialize)]
struct ListQueuesResult {
    #[serde(rename = "QueueUrl", default)]
    queue_urls: Vec<String>,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    #[serde(rename = "SendMessageResult")]
    result: SendMessageOutput,
}

#[derive(Deserialize)]
struct ReceiveMessageResponse {
    #[serde(rename = "ReceiveMessageResult", default)]
    result: ReceiveMessageResult,
}

#[derive(Default, Deserialize)]
struct ReceiveMessageResult {
    #[serde(rename = "Message", default)]
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(rename = "MessageId")]
    message_id: String,
    #[serde(rename = "ReceiptHandle")]
    receipt_handle: String,
    #[serde(rename = "MD5OfBody", default)]
    md5_of_body: Option<String>,
    #[serde(rename = "Body", default)]
    body: String,
    #[serde(rename = "Attribute", default)]
    attributes: Vec<Attribute>,
}

impl From<WireMessage> for Message {
    fn from(message: WireMessage) -> Self {
        Self {
            message_id: message.message_id,
            receipt_handle: message.receipt_handle,
            md5_of_body: message.md5_of_body,
            body: message.body,
            attributes: attribute_map(message.attributes),
        }
    }
}

#[derive(Deserialize)]
struct GetQueueAttributesResponse {
    #[serde(rename = "GetQueueAttributesResult", default)]
    result: GetQueueAttributesResult,
}

#[derive(Default, Deserialize)]
struct GetQueueAttributesResult {
    #[serde(rename = "Attribute", default)]
    attributes: Vec<Attribute>,
}

impl Sqs {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    async fn call(&self, action: &str, params: &[(String, String)]) -> Result<bytes::Bytes> {
        invoke_query(&self.dispatcher, Service::Sqs, action, params).await
    }

    /// Create a queue, or return the existing one if the attributes match.
    #[tracing::instrument(skip(self, attributes))]
    pub async fn create_queue(
        &self,
        name: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<Queue> {
        let mut params = vec![("QueueName".to_string(), name.to_string())];
        // Sorted so the request body is stable
        let mut sorted: Vec<_> = attributes.iter().collect();
        sorted.sort();
        for (i, (key, value)) in sorted.into_iter().enumerate() {
            params.push((format!("Attribute.{}.Name", i + 1), key.clone()));
            params.push((format!("Attribute.{}.Value", i + 1), value.clone()));
        }

        let body = self.call("CreateQueue", &params).await?;
        let response: CreateQueueResponse = decode_xml("CreateQueue", &body)?;
        Ok(self.queue(response.result.queue_url))
    }

    /// Look up a queue by name.
    #[tracing::instrument(skip(self))]
    pub async fn get_queue_url(&self, name: &str) -> Result<Queue> {
        let params = vec![("QueueName".to_string(), name.to_string())];
        let body = self.call("GetQueueUrl", &params).await?;
        let response: GetQueueUrlResponse = decode_xml("GetQueueUrl", &body)?;
        Ok(self.queue(response.result.queue_url))
    }

    /// List queues, optionally only those whose name starts with `prefix`.
    #[tracing::instrument(skip(self))]
    pub async fn list_queues(&self, prefix: Option<&str>) -> Result<Vec<Queue>> {
        let params: QueryParams = prefix
            .map(|p| ("QueueNamePrefix".to_string(), p.to_string()))
            .into_iter()
            .collect();
        let body = self.call("ListQueues", &params).await?;
        let response: ListQueuesResponse = decode_xml("ListQueues", &body)?;
        Ok(response
            .result
            .queue_urls
            .into_iter()
            .map(|url| self.queue(url))
            .collect())
    }

    /// A handle to the queue at `url`. Sends no request.
    pub fn queue(&self, url: impl Into<String>) -> Queue {
        Queue {
            url: url.into(),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl Queue {
    /// Queue URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Queue name: the last path segment of the URL.
    pub fn name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    async fn call(&self, action: &str, mut params: QueryParams) -> Result<bytes::Bytes> {
        params.insert(0, ("QueueUrl".to_string(), self.url.clone()));
        invoke_query(&self.dispatcher, Service::Sqs, action, &params).await
    }

    /// Send a message.
    #[tracing::instrument(skip(self, body), fields(queue = %self.name()))]
    pub async fn send_message(&self, body: &str) -> Result<SendMessageOutput> {
        let params = vec![("MessageBody".to_string(), body.to_string())];
        let response = self.call("SendMessage", params).await?;
        let response: SendMessageResponse = decode_xml("SendMessage", &response)?;
        Ok(response.result)
    }

    /// Receive up to `request.max_number_of_messages` messages.
    ///
    /// An empty queue yields an empty vector.
    #[tracing::instrument(skip(self, request), fields(queue = %self.name()))]
    pub async fn receive_messages(&self, request: &ReceiveMessageRequest) -> Result<Vec<Message>> {
        let body = self.call("ReceiveMessage", request.params()).await?;
        let response: ReceiveMessageResponse = decode_xml("ReceiveMessage", &body)?;
        Ok(response
            .result
            .messages
            .into_iter()
            .map(Message::from)
            .collect())
    }

    /// Delete a received message.
    #[tracing::instrument(skip(self, receipt_handle), fields(queue = %self.name()))]
    pub async fn delete_message(&self, receipt_handle: &str) -> Result<()> {
        let params = vec![("ReceiptHandle".to_string(), receipt_handle.to_string())];
        self.call("DeleteMessage", params).await?;
        Ok(())
    }

    /// Queue attributes. An empty `names` asks for all of them.
    #[tracing::instrument(skip(self), fields(queue = %self.name()))]
    pub async fn attributes(&self, names: &[String]) -> Result<HashMap<String, String>> {
        let params: QueryParams = if names.is_empty() {
            vec![("AttributeName.1".to_string(), "All".to_string())]
        } else {
            indexed("AttributeName", names).collect()
        };
        let body = self.call("GetQueueAttributes", params).await?;
        let response: GetQueueAttributesResponse = decode_xml("GetQueueAttributes", &body)?;
        Ok(attribute_map(response.result.attributes))
    }

    /// Delete the queue.
    #[tracing::instrument(skip(self), fields(queue = %self.name()))]
    pub async fn delete(&self) -> Result<()> {
        self.call("DeleteQueue", QueryParams::new()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_create_queue() {
        let body = r#"<CreateQueueResponse>
  <CreateQueueResult>
    <QueueUrl>https://sqs.us-east-1.amazonaws.com/123456789012/jobs</QueueUrl>
  </CreateQueueResult>
  <ResponseMetadata><RequestId>7a62c49f-347e-4fc4-9331-6e8e7a96aa73</RequestId></ResponseMetadata>
</CreateQueueResponse>"#;

        let response: CreateQueueResponse = decode_xml("CreateQueue", body.as_bytes()).unwrap();
        assert_eq!(
            response.result.queue_url,
            "https://sqs.us-east-1.amazonaws.com/123456789012/jobs"
        );
    }

    #[test]
    fn test_decode_list_queues() {
        let body = r#"<ListQueuesResponse>
  <ListQueuesResult>
    <QueueUrl>https://sqs.us-east-1.amazonaws.com/123456789012/jobs</QueueUrl>
    <QueueUrl>https://sqs.us-east-1.amazonaws.com/123456789012/jobs-dlq</QueueUrl>
  </ListQueuesResult>
</ListQueuesResponse>"#;

        let response: ListQueuesResponse = decode_xml("ListQueues", body.as_bytes()).unwrap();
        assert_eq!(response.result.queue_urls.len(), 2);

        let empty = r#"<ListQueuesResponse><ListQueuesResult/></ListQueuesResponse>"#;
        let response: ListQueuesResponse = decode_xml("ListQueues", empty.as_bytes()).unwrap();
        assert!(response.result.queue_urls.is_empty());
    }

    #[test]
    fn test_decode_receive_message() {
        let body = r#"<ReceiveMessageResponse>
  <ReceiveMessageResult>
    <Message>
      <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>
      <ReceiptHandle>MbZj6wDWli+JvwwJaBV+3dcjk2YW2vA3+STFFljTM8tJJg6HRG6PYSasuWXPJB+Cw</ReceiptHandle>
      <MD5OfBody>fafb00f5732ab283681e124bf8747ed1</MD5OfBody>
      <Body>This is a test message</Body>
      <Attribute><Name>SenderId</Name><Value>195004372649</Value></Attribute>
      <Attribute><Name>ApproximateReceiveCount</Name><Value>5</Value></Attribute>
    </Message>
  </ReceiveMessageResult>
</ReceiveMessageResponse>"#;

        let response: ReceiveMessageResponse =
            decode_xml("ReceiveMessage", body.as_bytes()).unwrap();
        let messages: Vec<Message> = response.result.messages.into_iter().map(Message::from).collect();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "This is a test message");
        assert_eq!(
            messages[0].md5_of_body.as_deref(),
            Some("fafb00f5732ab283681e124bf8747ed1")
        );
        assert_eq!(messages[0].attributes["ApproximateReceiveCount"], "5");
        assert_eq!(messages[0].attributes.len(), 2);
    }

    #[test]
    fn test_decode_empty_receive() {
        let body = r#"<ReceiveMessageResponse><ReceiveMessageResult/></ReceiveMessageResponse>"#;
        let response: ReceiveMessageResponse =
            decode_xml("ReceiveMessage", body.as_bytes()).unwrap();
        assert!(response.result.messages.is_empty());
    }

    #[test]
    fn test_decode_send_message() {
        let body = r#"<SendMessageResponse>
  <SendMessageResult>
    <MD5OfMessageBody>fafb00f5732ab283681e124bf8747ed1</MD5OfMessageBody>
    <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>
  </SendMessageResult>
</SendMessageResponse>"#;

        let response: SendMessageResponse = decode_xml("SendMessage", body.as_bytes()).unwrap();
        assert_eq!(response.result.message_id, "5fea7756-0ea4-451a-a703-a558b933e274");
    }

    #[test]
    fn test_receive_request_params() {
        let request = ReceiveMessageRequest {
            max_number_of_messages: Some(10),
            wait_time_seconds: Some(20),
            attribute_names: vec!["SenderId".to_string(), "SentTimestamp".to_string()],
            ..Default::default()
        };

        assert_eq!(
            request.params(),
            vec![
                ("MaxNumberOfMessages".to_string(), "10".to_string()),
                ("WaitTimeSeconds".to_string(), "20".to_string()),
                ("AttributeName.1".to_string(), "SenderId".to_string()),
                ("AttributeName.2".to_string(), "SentTimestamp".to_string()),
            ]
        );
    }
}

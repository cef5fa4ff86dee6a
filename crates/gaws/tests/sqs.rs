//! SQS queue lifecycle against a mock server

mod common;

use std::collections::HashMap;

use assert_matches::assert_matches;
use gaws::Error;
use gaws::resources::sqs::ReceiveMessageRequest;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/jobs";
const ENCODED_QUEUE_URL: &str =
    "QueueUrl=https%3A%2F%2Fsqs.us-east-1.amazonaws.com%2F123456789012%2Fjobs";

fn action(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(body_string_contains(format!("Action={}", name)))
        .and(body_string_contains("Version=2012-11-05"))
}

#[tokio::test]
async fn test_create_queue_with_attributes() {
    let server = MockServer::start().await;
    action("CreateQueue")
        .and(body_string_contains("QueueName=jobs"))
        .and(body_string_contains("Attribute.1.Name=DelaySeconds"))
        .and(body_string_contains("Attribute.1.Value=5"))
        .and(body_string_contains("Attribute.2.Name=VisibilityTimeout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<CreateQueueResponse><CreateQueueResult><QueueUrl>{}</QueueUrl></CreateQueueResult></CreateQueueResponse>",
            QUEUE_URL
        )))
        .expect(1)
        .mount(&server)
        .await;

    let attributes = HashMap::from([
        ("VisibilityTimeout".to_string(), "60".to_string()),
        ("DelaySeconds".to_string(), "5".to_string()),
    ]);
    let queue = common::client(&server)
        .sqs()
        .create_queue("jobs", &attributes)
        .await
        .unwrap();

    assert_eq!(queue.url(), QUEUE_URL);
    assert_eq!(queue.name(), "jobs");
}

#[tokio::test]
async fn test_get_queue_url_and_list() {
    let server = MockServer::start().await;
    action("GetQueueUrl")
        .and(body_string_contains("QueueName=jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<GetQueueUrlResponse><GetQueueUrlResult><QueueUrl>{}</QueueUrl></GetQueueUrlResult></GetQueueUrlResponse>",
            QUEUE_URL
        )))
        .expect(1)
        .mount(&server)
        .await;
    action("ListQueues")
        .and(body_string_contains("QueueNamePrefix=jo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<ListQueuesResponse><ListQueuesResult><QueueUrl>{0}</QueueUrl><QueueUrl>{0}-dlq</QueueUrl></ListQueuesResult></ListQueuesResponse>",
            QUEUE_URL
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let queue = client.sqs().get_queue_url("jobs").await.unwrap();
    assert_eq!(queue.url(), QUEUE_URL);

    let queues = client.sqs().list_queues(Some("jo")).await.unwrap();
    let names: Vec<_> = queues.iter().map(|q| q.name()).collect();
    assert_eq!(names, vec!["jobs", "jobs-dlq"]);
}

#[tokio::test]
async fn test_message_round_trip() {
    let server = MockServer::start().await;
    action("SendMessage")
        .and(body_string_contains(ENCODED_QUEUE_URL))
        .and(body_string_contains("MessageBody=hello+queue"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<SendMessageResponse><SendMessageResult>\
             <MD5OfMessageBody>0a1f4c1b7f64ab0ca9fdf2ab6ef3e1ff</MD5OfMessageBody>\
             <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>\
             </SendMessageResult></SendMessageResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    action("ReceiveMessage")
        .and(body_string_contains("MaxNumberOfMessages=10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<ReceiveMessageResponse><ReceiveMessageResult><Message>\
             <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>\
             <ReceiptHandle>handle-1</ReceiptHandle>\
             <MD5OfBody>0a1f4c1b7f64ab0ca9fdf2ab6ef3e1ff</MD5OfBody>\
             <Body>hello queue</Body>\
             </Message></ReceiveMessageResult></ReceiveMessageResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    action("DeleteMessage")
        .and(body_string_contains("ReceiptHandle=handle-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<DeleteMessageResponse><ResponseMetadata><RequestId>r</RequestId></ResponseMetadata></DeleteMessageResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let queue = client.sqs().queue(QUEUE_URL);

    let sent = queue.send_message("hello queue").await.unwrap();
    assert_eq!(sent.message_id, "5fea7756-0ea4-451a-a703-a558b933e274");

    let request = ReceiveMessageRequest {
        max_number_of_messages: Some(10),
        ..Default::default()
    };
    let messages = queue.receive_messages(&request).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "hello queue");
    assert_eq!(messages[0].message_id, sent.message_id);

    queue.delete_message(&messages[0].receipt_handle).await.unwrap();
}

#[tokio::test]
async fn test_queue_attributes_default_to_all() {
    let server = MockServer::start().await;
    action("GetQueueAttributes")
        .and(body_string_contains("AttributeName.1=All"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<GetQueueAttributesResponse><GetQueueAttributesResult>\
             <Attribute><Name>VisibilityTimeout</Name><Value>30</Value></Attribute>\
             <Attribute><Name>ApproximateNumberOfMessages</Name><Value>0</Value></Attribute>\
             </GetQueueAttributesResult></GetQueueAttributesResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let attributes = common::client(&server)
        .sqs()
        .queue(QUEUE_URL)
        .attributes(&[])
        .await
        .unwrap();

    assert_eq!(attributes["VisibilityTimeout"], "30");
    assert_eq!(attributes.len(), 2);
}

#[tokio::test]
async fn test_delete_missing_queue() {
    let server = MockServer::start().await;
    action("DeleteQueue")
        .and(body_string_contains(ENCODED_QUEUE_URL))
        .respond_with(ResponseTemplate::new(400).set_body_string(common::query_error(
            "AWS.SimpleQueueService.NonExistentQueue",
            "The specified queue does not exist for this wsdl version.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = common::client(&server)
        .sqs()
        .queue(QUEUE_URL)
        .delete()
        .await
        .unwrap_err();

    assert_matches!(&err, Error::Service(_));
    assert_eq!(err.error_type(), Some("AWS.SimpleQueueService.NonExistentQueue"));
}

#[tokio::test]
async fn test_request_throttled_is_retried() {
    let server = MockServer::start().await;
    action("SendMessage")
        .respond_with(
            ResponseTemplate::new(400).set_body_string(common::query_error("RequestThrottled", "")),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = common::client_with_attempts(&server, 3)
        .sqs()
        .queue(QUEUE_URL)
        .send_message("x")
        .await
        .unwrap_err();
    assert_matches!(err, Error::ExceededMaxRetries { attempts: 3, .. });
}

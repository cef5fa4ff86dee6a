//! Kinesis operations against a mock server

mod common;

use assert_matches::assert_matches;
use gaws::Error;
use gaws::resources::kinesis::{GetRecordsRequest, ShardIteratorType};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn operation(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(header("x-amz-target", common::kinesis_target(name).as_str()))
}

#[tokio::test]
async fn test_create_stream() {
    let server = MockServer::start().await;
    operation("CreateStream")
        .and(body_json(json!({"ShardCount": 2, "StreamName": "events"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let stream = common::client(&server)
        .kinesis()
        .create_stream("events", 2)
        .await
        .unwrap();
    assert_eq!(stream.name(), "events");
}

#[tokio::test]
async fn test_create_stream_rejects_zero_shards() {
    let server = MockServer::start().await;
    operation("CreateStream")
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = common::client(&server)
        .kinesis()
        .create_stream("events", 0)
        .await
        .unwrap_err();
    assert_matches!(err, Error::InvalidRequest(_));
}

#[tokio::test]
async fn test_put_record_encodes_data() {
    let server = MockServer::start().await;
    operation("PutRecord")
        .and(body_json(json!({
            "Data": "aGVsbG8=",
            "PartitionKey": "user-42",
            "StreamName": "events"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ShardId": "shardId-000000000000",
            "SequenceNumber": "49590338271490256608559692538361571095921575989136588898"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = common::client(&server)
        .kinesis()
        .stream("events")
        .put_record("user-42", b"hello")
        .await
        .unwrap();

    assert_eq!(output.shard_id, "shardId-000000000000");
    assert_eq!(output.encryption_type, None);
}

#[tokio::test]
async fn test_describe_stream() {
    let server = MockServer::start().await;
    operation("DescribeStream")
        .and(body_json(json!({"StreamName": "events"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "StreamDescription": {
                "StreamName": "events",
                "StreamARN": "arn:aws:kinesis:us-east-1:123456789012:stream/events",
                "StreamStatus": "ACTIVE",
                "HasMoreShards": false,
                "Shards": [
                    {
                        "ShardId": "shardId-000000000000",
                        "HashKeyRange": {
                            "StartingHashKey": "0",
                            "EndingHashKey": "170141183460469231731687303715884105727"
                        },
                        "SequenceNumberRange": {"StartingSequenceNumber": "1"}
                    },
                    {
                        "ShardId": "shardId-000000000001",
                        "HashKeyRange": {
                            "StartingHashKey": "170141183460469231731687303715884105728",
                            "EndingHashKey": "340282366920938463463374607431768211455"
                        },
                        "SequenceNumberRange": {"StartingSequenceNumber": "2"}
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let description = common::client(&server)
        .kinesis()
        .stream("events")
        .describe()
        .await
        .unwrap();

    assert!(description.is_active());
    assert_eq!(description.shards.len(), 2);
    assert_eq!(
        description.shards[1].hash_key_range.starting_hash_key,
        "170141183460469231731687303715884105728"
    );
}

#[tokio::test]
async fn test_delete_stream_not_found() {
    let server = MockServer::start().await;
    operation("DeleteStream")
        .and(body_json(json!({"StreamName": "gone"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(common::json_error(
            "ResourceNotFoundException",
            "Stream gone under account 123456789012 not found.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = common::client(&server)
        .kinesis()
        .stream("gone")
        .delete()
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), Some("ResourceNotFoundException"));
}

#[tokio::test]
async fn test_get_shard_iterator() {
    let server = MockServer::start().await;
    operation("GetShardIterator")
        .and(body_json(json!({
            "ShardId": "shardId-000000000000",
            "ShardIteratorType": "AFTER_SEQUENCE_NUMBER",
            "StartingSequenceNumber": "42",
            "StreamName": "events"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ShardIterator": "AAAAAAAAAAE="})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let iterator = common::client(&server)
        .kinesis()
        .stream("events")
        .get_shard_iterator(
            "shardId-000000000000",
            ShardIteratorType::AfterSequenceNumber,
            Some("42"),
        )
        .await
        .unwrap();
    assert_eq!(iterator, "AAAAAAAAAAE=");
}

#[tokio::test]
async fn test_get_shard_iterator_requires_sequence_number() {
    let server = MockServer::start().await;
    operation("GetShardIterator")
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = common::client(&server)
        .kinesis()
        .stream("events")
        .get_shard_iterator("shardId-000000000000", ShardIteratorType::AtSequenceNumber, None)
        .await
        .unwrap_err();
    assert_matches!(err, Error::InvalidRequest(_));
}

#[tokio::test]
async fn test_get_records() {
    let server = MockServer::start().await;
    operation("GetRecords")
        .and(body_json(json!({"ShardIterator": "iter-1", "Limit": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Records": [{
                "Data": "SGVsbG8gV29ybGQ=",
                "PartitionKey": "user-42",
                "SequenceNumber": "21269319989652663814458848515492872193",
                "ApproximateArrivalTimestamp": 1.441215410867E9
            }],
            "NextShardIterator": "iter-2",
            "MillisBehindLatest": 2100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = common::client(&server)
        .kinesis()
        .stream("events")
        .get_records(&GetRecordsRequest::new("iter-1").limit(10))
        .await
        .unwrap();

    assert_eq!(response.records.len(), 1);
    assert_eq!(response.records[0].bytes().unwrap(), b"Hello World");
    assert_eq!(response.next_shard_iterator.as_deref(), Some("iter-2"));
    assert_eq!(response.millis_behind_latest, Some(2100));
}

#[tokio::test]
async fn test_merge_and_split_shards() {
    let server = MockServer::start().await;
    operation("MergeShards")
        .and(body_json(json!({
            "AdjacentShardToMerge": "shardId-000000000001",
            "ShardToMerge": "shardId-000000000000",
            "StreamName": "events"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    operation("SplitShard")
        .and(body_json(json!({
            "NewStartingHashKey": "10",
            "ShardToSplit": "shardId-000000000002",
            "StreamName": "events"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client(&server);
    let stream = client.kinesis().stream("events");
    stream
        .merge_shards("shardId-000000000000", "shardId-000000000001")
        .await
        .unwrap();
    stream.split_shard("shardId-000000000002", "10").await.unwrap();
}

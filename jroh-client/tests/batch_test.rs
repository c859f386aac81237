//! Batch submission integration tests

mod common;

use common::{mock_response, recording_client};
use jroh_client::{params, BatchResponse, JrohClient};
use jroh_core::{BatchEntry, Error, JsonRpcErrorData, JsonRpcMessage, JsonRpcResponse};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_batch_over_http() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Exact(
            r#"[{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":0},{"jsonrpc":"2.0","method":"log","params":["x"]}]"#
                .to_string(),
        ))
        .with_body(format!("[{}]", mock_response(0, json!(3))))
        .create_async()
        .await;

    let client = JrohClient::new(server.url());
    let responses = client
        .batch(vec![
            client.new_request("sum", params![1, 2]).into(),
            client.new_notification("log", params!["x"]).into(),
        ])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].get_int().unwrap(), 3);
}

#[tokio::test]
async fn test_batch_keeps_server_order() {
    let (client, transport) = recording_client();
    transport.reply(
        r#"[{"jsonrpc":"2.0","result":"second","id":1},{"jsonrpc":"2.0","result":"first","id":0}]"#,
    );

    let first = client.new_request("a", params![]);
    let second = client.new_request("b", params![]);
    let responses = client
        .batch(vec![first.into(), second.into()])
        .await
        .unwrap();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].id, Some(1));
    assert_eq!(responses[1].id, Some(0));

    let indexed = BatchResponse::new(responses);
    let a: String = indexed.get(0).unwrap();
    let b: String = indexed.get(1).unwrap();
    assert_eq!(a, "first");
    assert_eq!(b, "second");
}

#[tokio::test]
async fn test_batch_rejects_response_entry_before_sending() {
    let (client, transport) = recording_client();

    let entries: Vec<JsonRpcMessage> = vec![
        client.new_request("sum", params![1, 2]).into(),
        JsonRpcResponse::success(json!(1), 9).into(),
    ];
    let result = client.batch(entries).await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_empty_batch_is_invalid() {
    let (client, transport) = recording_client();

    let result = client.batch(Vec::new()).await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_notification_only_batch_with_empty_body() {
    let (client, transport) = recording_client();
    transport.reply("");

    let responses = client
        .batch(vec![
            client.new_notification("a", params![]).into(),
            client.new_notification("b", params![1]).into(),
        ])
        .await
        .unwrap();

    assert!(responses.is_empty());
    assert_eq!(
        transport.bodies(),
        vec![r#"[{"jsonrpc":"2.0","method":"a"},{"jsonrpc":"2.0","method":"b","params":[1]}]"#]
    );
}

#[tokio::test]
async fn test_batch_with_requests_and_empty_body_is_decode_error() {
    let (client, transport) = recording_client();
    transport.reply("");

    let result = client
        .batch(vec![client.new_request("a", params![]).into()])
        .await;

    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_batch_rejected_as_a_whole() {
    let (client, transport) = recording_client();
    transport.reply(
        r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}"#,
    );

    let result = client
        .batch(vec![client.new_request("a", params![]).into()])
        .await;

    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_batch_mixed_results() {
    let (client, transport) = recording_client();
    let error = serde_json::to_string(&JsonRpcResponse::error(
        JsonRpcErrorData::method_not_found("missing"),
        1,
    ))
    .unwrap();
    transport.reply(format!("[{},{}]", mock_response(0, json!(42)), error));

    let sent = vec![
        BatchEntry::from(client.new_request("answer", params![])),
        BatchEntry::from(client.new_request("missing", params![])),
        BatchEntry::from(client.new_request("dropped", params![])),
    ];
    let responses = BatchResponse::new(client.batch_entries(&sent).await.unwrap());

    assert!(!responses.all_success());
    assert_eq!(responses.errors().len(), 1);
    assert_eq!(responses.missing_ids(&sent), vec![2]);

    let answer: i64 = responses.get(0).unwrap();
    assert_eq!(answer, 42);
    assert!(matches!(responses.get::<i64>(1), Err(Error::JsonRpc(_))));
    assert!(matches!(responses.get::<i64>(2), Err(Error::Internal(_))));
}

#[tokio::test]
async fn test_batch_ignores_http_status() {
    let (client, transport) = recording_client();
    transport.reply_with_status(400, format!("[{}]", mock_response(0, json!("ok"))));

    let responses = client
        .batch(vec![client.new_request("a", params![]).into()])
        .await
        .unwrap();

    assert_eq!(responses[0].get_string().unwrap(), "ok");
}

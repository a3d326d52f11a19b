// Integration tests for the HTTP upstream dispatcher against a local mock server
#![allow(clippy::unwrap_used, clippy::expect_used)]

use lambda_http_bridge::config::BridgeConfig;
use lambda_http_bridge::handler::Bridge;
use lambda_http_bridge::http::UpstreamDispatcher;
use lambda_runtime::Context;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn dispatcher_for(server: &mockito::Server) -> UpstreamDispatcher {
    let config = BridgeConfig {
        upstream_url: server.url(),
        upstream_timeout: Duration::from_secs(5),
    };
    UpstreamDispatcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_v2_event_forwarded_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/items")
        .match_header("cookie", "a=1;b=2")
        .match_header("content-type", "application/json")
        .match_body("{}")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", "c=3")
        .with_body("{\"id\":1}")
        .create_async()
        .await;

    let bridge = Bridge::new(dispatcher_for(&server));
    let event = json!({
        "rawPath": "/items",
        "requestContext": {"http": {"method": "POST"}},
        "headers": {"content-type": "application/json"},
        "cookies": ["a=1", "b=2"],
        "body": "e30=",
        "isBase64Encoded": true
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    mock.assert_async().await;
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["cookies"], json!(["c=3"]));
    assert_eq!(json["body"], "{\"id\":1}");
    assert_eq!(json["isBase64Encoded"], false);
    assert_eq!(json["headers"]["content-type"], "application/json");
    assert!(json["headers"].get("set-cookie").is_none());
}

#[tokio::test]
async fn test_query_string_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/search".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rust lang".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("found")
        .create_async()
        .await;

    let bridge = Bridge::new(dispatcher_for(&server));
    let event = json!({
        "path": "/search",
        "httpMethod": "GET",
        "queryStringParameters": {"q": "rust lang", "page": "2"},
        "requestContext": {"stage": "prod"}
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.status_code(), 200);
    assert_eq!(result.body(), "found");
}

#[tokio::test]
async fn test_binary_upstream_body_base64_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/logo.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0x89u8, 0x50, 0x4e, 0x47])
        .create_async()
        .await;

    let bridge = Bridge::new(dispatcher_for(&server));
    let event = json!({
        "path": "/logo.png",
        "httpMethod": "GET",
        "requestContext": {"elb": {"targetGroupArn": "arn:aws:elasticloadbalancing:tg"}}
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();

    mock.assert_async().await;
    assert!(result.is_base64_encoded());
    assert_eq!(result.body(), "iVBORw==");
}

#[tokio::test]
async fn test_multiple_set_cookie_headers_preserved() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/login")
        .with_status(200)
        .with_header("set-cookie", "a=1; Path=/")
        .with_header("set-cookie", "b=2; HttpOnly")
        .create_async()
        .await;

    let bridge = Bridge::new(dispatcher_for(&server));
    let event = json!({"path": "/login", "httpMethod": "GET"});

    let result = bridge.handle(event, Context::default()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    mock.assert_async().await;
    assert_eq!(
        json["multiValueHeaders"]["set-cookie"],
        json!(["a=1; Path=/", "b=2; HttpOnly"])
    );
}

#[tokio::test]
async fn test_request_id_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header("x-amzn-request-id", "abc-123")
        .with_status(204)
        .create_async()
        .await;

    let bridge = Bridge::new(dispatcher_for(&server));
    let mut context = Context::default();
    context.request_id = "abc-123".to_string();

    let result = bridge
        .handle(json!({"path": "/", "httpMethod": "GET"}), context)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.status_code(), 204);
}

#[tokio::test]
async fn test_unreachable_upstream_is_dispatch_error() {
    // Nothing listens on the discard port
    let dispatcher = UpstreamDispatcher::new(&BridgeConfig {
        upstream_url: "http://127.0.0.1:9".to_string(),
        upstream_timeout: Duration::from_secs(2),
    })
    .unwrap();
    let bridge = Bridge::new(dispatcher);

    let result = bridge
        .handle(json!({"path": "/", "httpMethod": "GET"}), Context::default())
        .await;

    assert!(matches!(result, Err(lambda_http_bridge::BridgeError::Dispatch(_))));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let dispatcher = UpstreamDispatcher::with_client(reqwest::Client::new(), "http://localhost:3000/");
    assert_eq!(dispatcher.base_url(), "http://localhost:3000");
}

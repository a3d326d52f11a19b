// Handler tests: full pipeline against a mocked application runtime
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use lambda_http_bridge::handler::Bridge;
use lambda_http_bridge::http::{DispatchRequest, Dispatcher};
use lambda_http_bridge::models::{BodyKind, CanonicalResponse, HeaderMap, OneOrMany, OutboundResult};
use lambda_http_bridge::BridgeError;
use lambda_runtime::{Context, LambdaEvent};
use mockall::mock;
use serde_json::{Value, json};

mock! {
    pub Runtime {}

    #[async_trait]
    impl Dispatcher for Runtime {
        async fn dispatch(&self, request: DispatchRequest) -> anyhow::Result<CanonicalResponse>;
    }
}

fn context_with_id(request_id: &str) -> Context {
    let mut context = Context::default();
    context.request_id = request_id.to_string();
    context
}

/// Runtime that echoes every cookie it received back as `set-cookie` entries.
fn echo_cookies_runtime() -> MockRuntime {
    let mut runtime = MockRuntime::new();
    runtime.expect_dispatch().returning(|dispatch| {
        let cookies: Vec<String> = dispatch
            .request
            .headers
            .get("cookie")
            .map(|value| value.values().iter().flat_map(|c| c.split(';')).map(str::to_string).collect())
            .unwrap_or_default();
        Ok(CanonicalResponse::new(200)
            .with_header("set-cookie", OneOrMany::Many(cookies))
            .with_body("ok"))
    });
    runtime
}

#[tokio::test]
async fn test_v2_end_to_end_scenario() {
    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .withf(|dispatch| {
            dispatch.request.method == "POST"
                && dispatch.request.url == "/items"
                && dispatch.request.headers.len() == 1
                && dispatch.request.headers.first("cookie") == Some("a=1;b=2")
                && dispatch.request.body == "{}"
                && dispatch.context.request_id == "req-123"
                && dispatch.event["rawPath"] == "/items"
        })
        .times(1)
        .returning(|_| {
            Ok(CanonicalResponse::new(201)
                .with_header("set-cookie", OneOrMany::Many(vec!["c=3".to_string()]))
                .with_body("{}"))
        });

    let bridge = Bridge::new(runtime);
    let event = json!({
        "rawPath": "/items",
        "requestContext": {"http": {"method": "POST"}},
        "headers": {},
        "cookies": ["a=1", "b=2"],
        "body": "e30=",
        "isBase64Encoded": true
    });

    let result = bridge
        .function_handler(LambdaEvent::new(event, context_with_id("req-123")))
        .await
        .unwrap();

    assert_eq!(
        result,
        json!({
            "statusCode": 201,
            "headers": {},
            "cookies": ["c=3"],
            "body": "{}",
            "isBase64Encoded": false
        })
    );
}

#[tokio::test]
async fn test_v2_cookie_round_trip() {
    let bridge = Bridge::new(echo_cookies_runtime());
    let event = json!({
        "rawPath": "/",
        "cookies": ["x=1", "y=2"],
        "requestContext": {"http": {"method": "GET"}}
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();
    match result {
        OutboundResult::GatewayV2(result) => {
            assert_eq!(result.cookies, Some(vec!["x=1".to_string(), "y=2".to_string()]));
        }
        other => panic!("Expected a v2 result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_v1_cookie_round_trip() {
    let bridge = Bridge::new(echo_cookies_runtime());
    let event = json!({
        "path": "/",
        "httpMethod": "GET",
        "multiValueHeaders": {"cookie": ["x=1"]},
        "requestContext": {"stage": "prod"}
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();
    match result {
        OutboundResult::GatewayV1(result) => {
            let multi = result.multi_value_headers.expect("set-cookie should be present");
            assert_eq!(multi.get("set-cookie"), Some(&vec!["x=1".to_string()]));
        }
        other => panic!("Expected a v1 result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_alb_cookie_round_trip() {
    let bridge = Bridge::new(echo_cookies_runtime());
    let event = json!({
        "path": "/",
        "httpMethod": "GET",
        "headers": {"cookie": "x=1"},
        "requestContext": {"elb": {"targetGroupArn": "arn:aws:elasticloadbalancing:tg"}}
    });

    let result = bridge.handle(event, Context::default()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(matches!(result, OutboundResult::Alb(_)));
    assert_eq!(json["multiValueHeaders"]["set-cookie"], json!(["x=1"]));
    assert!(json.get("cookies").is_none());
}

#[tokio::test]
async fn test_method_default_reaches_runtime() {
    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .withf(|dispatch| dispatch.request.method == "get")
        .times(1)
        .returning(|_| Ok(CanonicalResponse::new(204)));

    let bridge = Bridge::new(runtime);
    let result = bridge.handle(json!({"path": "/health"}), Context::default()).await.unwrap();
    assert_eq!(result.status_code(), 204);
}

#[tokio::test]
async fn test_malformed_event_never_dispatches() {
    let mut runtime = MockRuntime::new();
    runtime.expect_dispatch().never();

    let bridge = Bridge::new(runtime);
    let result = bridge
        .function_handler(LambdaEvent::new(json!({"httpMethod": "GET"}), Context::default()))
        .await;

    let diagnostic = result.expect_err("Missing path should fail");
    assert_eq!(diagnostic.error_type, "MalformedEvent");
}

#[tokio::test]
async fn test_non_object_payload_is_malformed() {
    let mut runtime = MockRuntime::new();
    runtime.expect_dispatch().never();

    let bridge = Bridge::new(runtime);
    let result = bridge.handle(Value::Null, Context::default()).await;
    assert!(matches!(result, Err(BridgeError::MalformedEvent(_))));
}

#[tokio::test]
async fn test_dispatch_failure_propagates_unchanged() {
    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("application crashed")));

    let bridge = Bridge::new(runtime);
    let event = json!({"path": "/", "httpMethod": "GET"});

    let result = bridge.handle(event, Context::default()).await;
    match result {
        Err(BridgeError::Dispatch(e)) => assert_eq!(e.to_string(), "application crashed"),
        other => panic!("Expected a dispatch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dispatch_failure_diagnostic() {
    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .returning(|_| Err(anyhow::anyhow!("application crashed")));

    let bridge = Bridge::new(runtime);
    let diagnostic = bridge
        .function_handler(LambdaEvent::new(json!({"path": "/", "httpMethod": "GET"}), Context::default()))
        .await
        .expect_err("Dispatch failure should surface");

    assert_eq!(diagnostic.error_type, "DispatchError");
    assert_eq!(diagnostic.error_message, "application crashed");
}

#[tokio::test]
async fn test_unencodable_response_is_encoding_error() {
    let mut runtime = MockRuntime::new();
    runtime.expect_dispatch().returning(|_| {
        Ok(CanonicalResponse::new(200)
            .with_header("content-type", "text/plain")
            .with_body(vec![0xff]))
    });

    let bridge = Bridge::new(runtime);
    let diagnostic = bridge
        .function_handler(LambdaEvent::new(json!({"path": "/", "httpMethod": "GET"}), Context::default()))
        .await
        .expect_err("Invalid UTF-8 text should fail");

    assert_eq!(diagnostic.error_type, "EncodingError");
}

#[tokio::test]
async fn test_custom_classifier_applies_to_untyped_bytes() {
    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .returning(|_| Ok(CanonicalResponse::new(200).with_body(b"plain".to_vec())));

    let default_bridge = Bridge::new(runtime);
    let result = default_bridge
        .handle(json!({"path": "/", "httpMethod": "GET"}), Context::default())
        .await
        .unwrap();
    assert!(result.is_base64_encoded(), "Bytes without a content type default to binary");

    let mut runtime = MockRuntime::new();
    runtime
        .expect_dispatch()
        .returning(|_| Ok(CanonicalResponse::new(200).with_body(b"plain".to_vec())));

    let text_bridge = Bridge::with_classifier(runtime, |_: &HeaderMap| BodyKind::Text);
    let result = text_bridge
        .handle(json!({"path": "/", "httpMethod": "GET"}), Context::default())
        .await
        .unwrap();
    assert!(!result.is_base64_encoded());
    assert_eq!(result.body(), "plain");
}

#[test]
fn test_bridges_are_independent() {
    let mut first = MockRuntime::new();
    first.expect_dispatch().returning(|_| Ok(CanonicalResponse::new(200)));
    let mut second = MockRuntime::new();
    second.expect_dispatch().returning(|_| Ok(CanonicalResponse::new(418)));

    let first = Bridge::new(first);
    let second = Bridge::new(second);
    let event = json!({"path": "/", "httpMethod": "GET"});

    let first_result = tokio_test::block_on(first.handle(event.clone(), Context::default())).unwrap();
    let second_result = tokio_test::block_on(second.handle(event, Context::default())).unwrap();

    assert_eq!(first_result.status_code(), 200);
    assert_eq!(second_result.status_code(), 418);
}

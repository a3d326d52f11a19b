use lambda_http_bridge::config::BridgeConfig;
use lambda_http_bridge::handler::Bridge;
use lambda_http_bridge::http::UpstreamDispatcher;
use lambda_runtime::tracing::info;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let config = BridgeConfig::from_env()?;
    info!(upstream = %config.upstream_url, timeout_ms = config.upstream_timeout.as_millis(), "Starting bridge");

    let bridge = Bridge::new(UpstreamDispatcher::new(&config)?);
    let bridge = &bridge;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        bridge.function_handler(event).await
    }))
    .await
}

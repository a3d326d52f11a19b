use anyhow::{Context as _, Result};
use async_trait::async_trait;
use lambda_runtime::tracing::{debug, info};
use reqwest::{Client, Method};

use super::{DispatchRequest, Dispatcher};
use crate::config::BridgeConfig;
use crate::models::{CanonicalResponse, HeaderMap, ResponseBody};

/// Headers that describe a single connection and must not be replayed.
const HOP_BY_HOP_HEADERS: [&str; 6] = [
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
];

/// Request header carrying the Lambda request id to the application.
pub const REQUEST_ID_HEADER: &str = "x-amzn-request-id";

/// Dispatcher that replays canonical requests against an HTTP application.
///
/// The response body is returned as raw bytes without a classification, so the outbound
/// normalizer decides text vs. binary from the response headers.
pub struct UpstreamDispatcher {
    client: Client,
    base_url: String,
}

impl UpstreamDispatcher {
    /// Creates a dispatcher with a pooled client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self::with_client(client, &config.upstream_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|header| name.eq_ignore_ascii_case(header))
}

#[async_trait]
impl Dispatcher for UpstreamDispatcher {
    async fn dispatch(&self, dispatch: DispatchRequest) -> Result<CanonicalResponse> {
        let DispatchRequest {
            request, context, ..
        } = dispatch;

        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("Invalid HTTP method: {}", request.method))?;
        let target = format!("{}{}", self.base_url, request.url);

        info!(method = %method, target = %target, "Forwarding request upstream");

        let mut builder = self.client.request(method, &target);
        for (name, value) in &request.headers {
            if is_hop_by_hop(name) {
                continue;
            }
            for value in value.values() {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if !context.request_id.is_empty() {
            builder = builder.header(REQUEST_ID_HEADER, context.request_id.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to upstream {target}"))?;

        let status = response.status().as_u16();
        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read upstream response body")?;

        debug!(status, body_len = body.len(), "Received upstream response");

        Ok(CanonicalResponse {
            status,
            headers,
            body: ResponseBody::Binary(body.to_vec()),
            kind: None,
        })
    }
}

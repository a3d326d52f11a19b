//! Inbound normalization: platform event -> canonical request.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::tracing::{debug, warn};
use serde_json::Value;

use crate::models::{
    BridgeError, CanonicalRequest, HeaderMap, InboundEvent, OneOrMany, ProxyEvent, QueryMap,
};
use crate::utils::{COOKIE, decode_component, encode_component, join_cookies};

/// Method used when neither `httpMethod` nor `requestContext.http.method` is set.
pub const DEFAULT_METHOD: &str = "get";

/// Builds the canonical request for an event.
///
/// # Errors
///
/// Returns `BridgeError::MalformedEvent` when no path can be resolved and
/// `BridgeError::Encoding` when a base64 body does not decode.
pub fn normalize_request(event: &InboundEvent) -> Result<CanonicalRequest, BridgeError> {
    let path = resolve_path(event)?;
    let method = resolve_method(event);
    let query = normalize_query(event);
    let url = build_url(&path, &query);
    let headers = fold_cookies(event, normalize_headers(event));
    let body = decode_body(event)?;

    debug!(
        shape = %event.shape(),
        method = %method,
        url = %url,
        header_count = headers.len(),
        body_len = body.len(),
        "Normalized inbound event"
    );

    Ok(CanonicalRequest {
        method,
        path,
        url,
        query,
        headers,
        body,
    })
}

/// Collects query parameters, keeping every repeated value.
///
/// The multi-value collection wins over the single-value one for the same key. ALB forwards
/// parameters still percent-encoded, so those are decoded here. For v2 events the raw query
/// string is preferred because the gateway comma-joins repeated keys in its parsed map.
#[must_use]
pub fn normalize_query(event: &InboundEvent) -> QueryMap {
    match event {
        InboundEvent::Alb(event) => merge_proxy_query(event, decode_component),
        InboundEvent::GatewayV1(event) => merge_proxy_query(event, str::to_owned),
        InboundEvent::GatewayV2(event) => match event.raw_query_string.as_deref() {
            Some(raw) if !raw.is_empty() => parse_query_string(raw),
            _ => event
                .query_string_parameters
                .iter()
                .flatten()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect(),
        },
    }
}

fn merge_proxy_query(event: &ProxyEvent, decode: fn(&str) -> String) -> QueryMap {
    let mut query = QueryMap::new();

    for (key, value) in event.query_string_parameters.iter().flatten() {
        query.insert(decode(key), OneOrMany::One(decode(value)));
    }

    for (key, values) in event.multi_value_query_string_parameters.iter().flatten() {
        let values = values.iter().map(|value| decode(value)).collect();
        if let Some(values) = OneOrMany::from_values(values) {
            query.insert(decode(key), values);
        }
    }

    query
}

fn parse_query_string(raw: &str) -> QueryMap {
    let mut query = QueryMap::new();

    for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.append(decode_component(key), decode_component(value));
    }

    query
}

/// Collects request headers, preserving the names as given.
///
/// When a header appears both in `headers` and `multiValueHeaders`, the multi-value entry wins.
#[must_use]
pub fn normalize_headers(event: &InboundEvent) -> HeaderMap {
    match event {
        InboundEvent::Alb(event) | InboundEvent::GatewayV1(event) => {
            let mut headers: HeaderMap = event
                .headers
                .iter()
                .flatten()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();

            for (name, values) in event.multi_value_headers.iter().flatten() {
                if let Some(values) = OneOrMany::from_values(values.clone()) {
                    headers.insert(name.as_str(), values);
                }
            }

            headers
        }
        InboundEvent::GatewayV2(event) => event
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect(),
    }
}

/// Resolves the request method: `httpMethod`, then `requestContext.http.method`, then `"get"`.
#[must_use]
pub fn resolve_method(event: &InboundEvent) -> String {
    let (direct, nested) = match event {
        InboundEvent::Alb(event) | InboundEvent::GatewayV1(event) => (
            event.http_method.as_deref(),
            event
                .request_context
                .as_ref()
                .and_then(|context| context.pointer("/http/method"))
                .and_then(Value::as_str),
        ),
        InboundEvent::GatewayV2(event) => (
            event.http_method.as_deref(),
            event
                .request_context
                .as_ref()
                .and_then(|context| context.http.as_ref())
                .and_then(|http| http.method.as_deref()),
        ),
    };

    direct
        .filter(|method| !method.is_empty())
        .or_else(|| nested.filter(|method| !method.is_empty()))
        .unwrap_or_else(|| {
            warn!(shape = %event.shape(), "Event carries no method, defaulting to {DEFAULT_METHOD}");
            DEFAULT_METHOD
        })
        .to_string()
}

/// Resolves the request path: `path`, then `rawPath`.
///
/// # Errors
///
/// Returns `BridgeError::MalformedEvent` if both are missing or empty.
pub fn resolve_path(event: &InboundEvent) -> Result<String, BridgeError> {
    let (path, raw_path) = match event {
        InboundEvent::Alb(event) | InboundEvent::GatewayV1(event) => (event.path.as_deref(), None),
        InboundEvent::GatewayV2(event) => (event.path.as_deref(), event.raw_path.as_deref()),
    };

    path.filter(|path| !path.is_empty())
        .or_else(|| raw_path.filter(|path| !path.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            BridgeError::MalformedEvent(format!("{} event has neither path nor rawPath", event.shape()))
        })
}

/// Appends the encoded query to `path`. An empty query yields the bare path.
///
/// Repeated keys serialize as repeated pairs in value order; an empty value serializes as a
/// bare key.
#[must_use]
pub fn build_url(path: &str, query: &QueryMap) -> String {
    let encoded: Vec<String> = query
        .iter()
        .flat_map(|(key, values)| {
            values.values().iter().map(move |value| {
                if value.is_empty() {
                    encode_component(key).into_owned()
                } else {
                    format!("{}={}", encode_component(key), encode_component(value))
                }
            })
        })
        .collect();

    if encoded.is_empty() {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{}", encoded.join("&"))
}

/// Folds v2 discrete cookies into a single `cookie` header.
///
/// The gateway's parsed cookies replace any raw `cookie` header, whatever its casing.
#[must_use]
pub fn fold_cookies(event: &InboundEvent, mut headers: HeaderMap) -> HeaderMap {
    if let Some(cookies) = event.cookies().filter(|cookies| !cookies.is_empty()) {
        headers.insert(COOKIE, join_cookies(cookies));
    }
    headers
}

/// Decodes the event body to text.
///
/// # Errors
///
/// Returns `BridgeError::Encoding` when a body flagged as base64 does not decode.
pub fn decode_body(event: &InboundEvent) -> Result<String, BridgeError> {
    let body = event.body().unwrap_or_default();
    if !event.is_base64_encoded() {
        return Ok(body.to_string());
    }

    let bytes = STANDARD.decode(body).map_err(|e| {
        BridgeError::Encoding(format!("request body is flagged base64 but does not decode: {e}"))
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Decoded request body is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

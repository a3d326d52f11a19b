//! Outbound normalization: canonical response -> platform result.

use lambda_runtime::tracing::debug;
use std::collections::BTreeMap;

use super::body::{BodyClassifier, EncodedBody, classify_body};
use crate::models::{
    BridgeError, CanonicalResponse, EventShape, HeaderMap, OutboundResult, ProxyResult,
    ProxyResultV2,
};
use crate::utils::SET_COOKIE;

/// Builds the platform result for a response to an event of the given shape.
///
/// # Errors
///
/// Returns `BridgeError::Encoding` if the body cannot be encoded or the status is out of range.
pub fn normalize_response(
    response: CanonicalResponse,
    shape: EventShape,
    classifier: &dyn BodyClassifier,
) -> Result<OutboundResult, BridgeError> {
    let CanonicalResponse {
        status,
        headers,
        body,
        kind,
    } = response;

    let encoded = classify_body(body, kind, &headers, classifier)?;
    let cookies = extract_cookies(&headers);

    debug!(
        status,
        shape = %shape,
        cookie_count = cookies.len(),
        base64 = encoded.is_base64_encoded(),
        "Normalizing outbound response"
    );

    build_result(status, &headers, cookies, encoded, shape)
}

/// Reads `set-cookie` as a list. Entries are not re-parsed.
#[must_use]
pub fn extract_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get(SET_COOKIE)
        .map(|cookies| cookies.values().to_vec())
        .unwrap_or_default()
}

/// Flattens headers to one lower-cased value each, dropping `set-cookie`.
///
/// Repeated values are joined with `,`, as are names that collide once lower-cased. This loses
/// the distinction between one comma-separated value and several values.
#[must_use]
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flattened: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        if name == SET_COOKIE {
            continue;
        }

        let value = value.join(",");
        flattened
            .entry(name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    flattened
}

/// Assembles the result for `shape`.
///
/// Cookies go to `cookies` for v2 and to `multiValueHeaders["set-cookie"]` otherwise. With no
/// cookies neither field is present.
///
/// # Errors
///
/// Returns `BridgeError::Encoding` if `status` is outside 100..=599.
pub fn build_result(
    status: u16,
    headers: &HeaderMap,
    cookies: Vec<String>,
    body: EncodedBody,
    shape: EventShape,
) -> Result<OutboundResult, BridgeError> {
    if !(100..=599).contains(&status) {
        return Err(BridgeError::Encoding(format!(
            "status code {status} is outside 100..=599"
        )));
    }

    let is_base64_encoded = body.is_base64_encoded();
    let headers = flatten_headers(headers);
    let cookies = (!cookies.is_empty()).then_some(cookies);

    Ok(match shape {
        EventShape::GatewayV2 => OutboundResult::GatewayV2(ProxyResultV2 {
            status_code: status,
            headers,
            cookies,
            body: body.body,
            is_base64_encoded,
        }),
        EventShape::Alb | EventShape::GatewayV1 => {
            let result = ProxyResult {
                status_code: status,
                headers,
                multi_value_headers: cookies
                    .map(|cookies| BTreeMap::from([(SET_COOKIE.to_string(), cookies)])),
                body: body.body,
                is_base64_encoded,
            };
            if shape == EventShape::Alb {
                OutboundResult::Alb(result)
            } else {
                OutboundResult::GatewayV1(result)
            }
        }
    })
}

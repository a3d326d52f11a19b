//! Result objects returned to the hosting platform.
//!
//! Field names are fixed by the platform. Cookie fields are omitted entirely when the response
//! set no cookies; an empty array would be read as an explicit (empty) cookie list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ALB and REST gateway (v1) result; cookies travel as `multiValueHeaders["set-cookie"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<BTreeMap<String, Vec<String>>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// HTTP API gateway (v2) result; cookies travel as a discrete array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResultV2 {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<String>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Result mirroring the variant of the event that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum OutboundResult {
    Alb(ProxyResult),
    GatewayV1(ProxyResult),
    GatewayV2(ProxyResultV2),
}

impl OutboundResult {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Alb(result) | Self::GatewayV1(result) => result.status_code,
            Self::GatewayV2(result) => result.status_code,
        }
    }

    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Alb(result) | Self::GatewayV1(result) => &result.headers,
            Self::GatewayV2(result) => &result.headers,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Alb(result) | Self::GatewayV1(result) => &result.body,
            Self::GatewayV2(result) => &result.body,
        }
    }

    #[must_use]
    pub const fn is_base64_encoded(&self) -> bool {
        match self {
            Self::Alb(result) | Self::GatewayV1(result) => result.is_base64_encoded,
            Self::GatewayV2(result) => result.is_base64_encoded,
        }
    }
}

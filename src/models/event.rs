//! Inbound invocation events delivered by the hosting platform.
//!
//! Three shapes reach the bridge: load balancer (ALB) events, REST API gateway (v1) events and
//! HTTP API gateway (v2) events, the last also used by function URLs. ALB and v1 share a wire
//! layout; v2 moves the method under `requestContext.http` and carries discrete cookies.

use schemars::JsonSchema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::error::BridgeError;

/// ALB and REST gateway (v1) event layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// HTTP API gateway (v2) and function URL event layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_key: Option<String>,
    /// Takes precedence over `rawPath` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_query_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<HttpApiRequestContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiRequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Which platform shape an event (and therefore its result) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventShape {
    Alb,
    GatewayV1,
    GatewayV2,
}

impl EventShape {
    /// Detects the shape of a raw payload.
    ///
    /// `rawPath` or `cookies` marks the v2 family, an `elb` request context marks ALB,
    /// anything else is treated as a v1 gateway event.
    #[must_use]
    pub fn detect(payload: &Value) -> Self {
        if payload.get("rawPath").is_some() || payload.get("cookies").is_some() {
            Self::GatewayV2
        } else if payload.pointer("/requestContext/elb").is_some() {
            Self::Alb
        } else {
            Self::GatewayV1
        }
    }

    /// The variant flag: v2 results carry cookies as a discrete array.
    #[must_use]
    pub const fn is_v2(self) -> bool {
        matches!(self, Self::GatewayV2)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alb => "alb",
            Self::GatewayV1 => "apigw-v1",
            Self::GatewayV2 => "apigw-v2",
        }
    }
}

impl fmt::Display for EventShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation event, discriminated by shape.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum InboundEvent {
    Alb(ProxyEvent),
    GatewayV1(ProxyEvent),
    GatewayV2(HttpApiEvent),
}

impl InboundEvent {
    /// Parses a raw invocation payload into the matching variant.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MalformedEvent` if the payload is not an object or its fields do
    /// not fit the detected shape.
    pub fn from_value(payload: &Value) -> Result<Self, BridgeError> {
        if !payload.is_object() {
            return Err(BridgeError::MalformedEvent(
                "event payload must be a JSON object".to_string(),
            ));
        }

        let shape = EventShape::detect(payload);
        let malformed =
            |e: serde_json::Error| BridgeError::MalformedEvent(format!("invalid {shape} event: {e}"));

        let parsed = match shape {
            EventShape::Alb => ProxyEvent::deserialize(payload).map(Self::Alb),
            EventShape::GatewayV1 => ProxyEvent::deserialize(payload).map(Self::GatewayV1),
            EventShape::GatewayV2 => HttpApiEvent::deserialize(payload).map(Self::GatewayV2),
        };
        parsed.map_err(malformed)
    }

    #[must_use]
    pub const fn shape(&self) -> EventShape {
        match self {
            Self::Alb(_) => EventShape::Alb,
            Self::GatewayV1(_) => EventShape::GatewayV1,
            Self::GatewayV2(_) => EventShape::GatewayV2,
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Alb(event) | Self::GatewayV1(event) => event.body.as_deref(),
            Self::GatewayV2(event) => event.body.as_deref(),
        }
    }

    #[must_use]
    pub const fn is_base64_encoded(&self) -> bool {
        match self {
            Self::Alb(event) | Self::GatewayV1(event) => event.is_base64_encoded,
            Self::GatewayV2(event) => event.is_base64_encoded,
        }
    }

    /// Discrete cookies; only v2 events carry them.
    #[must_use]
    pub fn cookies(&self) -> Option<&[String]> {
        match self {
            Self::Alb(_) | Self::GatewayV1(_) => None,
            Self::GatewayV2(event) => event.cookies.as_deref(),
        }
    }
}

impl<'de> Deserialize<'de> for InboundEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = Value::deserialize(deserializer)?;
        Self::from_value(&payload).map_err(de::Error::custom)
    }
}

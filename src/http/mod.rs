pub mod client;

use async_trait::async_trait;
use lambda_runtime::Context;
use serde_json::Value;

use crate::models::{CanonicalRequest, CanonicalResponse};

pub use client::UpstreamDispatcher;

/// Everything the application runtime receives for one invocation.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub request: CanonicalRequest,
    pub context: Context,
    /// The untouched invocation payload, for runtimes that need platform-specific fields.
    pub event: Value,
}

/// Boundary to the application runtime that turns a canonical request into a response.
///
/// Implementations own their timeout and retry policy; the bridge awaits the call once and
/// passes any error through unchanged.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Handles one canonical request.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime fails to produce a response.
    async fn dispatch(&self, request: DispatchRequest) -> anyhow::Result<CanonicalResponse>;
}

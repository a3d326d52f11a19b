//! Translation layer between Lambda HTTP invocation events and a canonical HTTP model.
//!
//! ALB, REST API gateway (v1) and HTTP API gateway (v2) events are normalized into a
//! [`models::CanonicalRequest`], handed to a [`http::Dispatcher`], and the resulting
//! [`models::CanonicalResponse`] is shaped back into the result format of the originating event.

pub mod config;
pub mod handler;
pub mod http;
pub mod models;
pub mod normalize;
pub mod utils;

pub use handler::Bridge;
pub use models::BridgeError;

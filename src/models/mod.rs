pub mod canonical;
pub mod error;
pub mod event;
pub mod headers;
pub mod result;

pub use canonical::{BodyKind, CanonicalRequest, CanonicalResponse, QueryMap, ResponseBody};
pub use error::BridgeError;
pub use event::{EventShape, HttpApiEvent, HttpApiRequestContext, HttpDescription, InboundEvent, ProxyEvent};
pub use headers::{HeaderMap, OneOrMany};
pub use result::{OutboundResult, ProxyResult, ProxyResultV2};

pub mod body;
pub mod inbound;
pub mod outbound;

pub use body::{BodyClassifier, ContentTypeClassifier, EncodedBody, classify_body};
pub use inbound::{
    DEFAULT_METHOD, build_url, decode_body, fold_cookies, normalize_headers, normalize_query,
    normalize_request, resolve_method, resolve_path,
};
pub use outbound::{build_result, extract_cookies, flatten_headers, normalize_response};

//! Response body classification and transport encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::models::{BodyKind, BridgeError, HeaderMap, ResponseBody};

/// Decides whether a byte body is text or binary from the response headers.
pub trait BodyClassifier: Send + Sync {
    fn classify(&self, headers: &HeaderMap) -> BodyKind;
}

impl<F> BodyClassifier for F
where
    F: Fn(&HeaderMap) -> BodyKind + Send + Sync,
{
    fn classify(&self, headers: &HeaderMap) -> BodyKind {
        self(headers)
    }
}

/// Default policy based on `content-type` and `content-encoding`.
///
/// Compressed bodies are always binary. Otherwise `text/*`, JavaScript, JSON and XML media
/// types and any UTF-8 charset are text; everything else, including a missing content type,
/// is binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeClassifier;

impl BodyClassifier for ContentTypeClassifier {
    fn classify(&self, headers: &HeaderMap) -> BodyKind {
        let compressed = headers
            .first("content-encoding")
            .is_some_and(|encoding| !encoding.trim().eq_ignore_ascii_case("identity"));
        if compressed {
            return BodyKind::Binary;
        }

        let content_type = headers
            .first("content-type")
            .unwrap_or_default()
            .to_ascii_lowercase();

        if is_text_type(&content_type) {
            BodyKind::Text
        } else {
            BodyKind::Binary
        }
    }
}

fn is_text_type(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || ["/javascript", "/json", "/xml", "utf-8", "utf8"]
            .iter()
            .any(|marker| content_type.contains(marker))
}

/// Body ready for the platform result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub kind: BodyKind,
    pub body: String,
}

impl EncodedBody {
    #[must_use]
    pub const fn is_base64_encoded(&self) -> bool {
        matches!(self.kind, BodyKind::Binary)
    }
}

/// Classifies and encodes a response body.
///
/// A classification supplied by the runtime wins. Without one, text bodies stay text, empty
/// byte bodies become empty text and other byte bodies go through `classifier`.
///
/// # Errors
///
/// Returns `BridgeError::Encoding` when a byte body classified as text is not valid UTF-8.
pub fn classify_body(
    body: ResponseBody,
    kind: Option<BodyKind>,
    headers: &HeaderMap,
    classifier: &dyn BodyClassifier,
) -> Result<EncodedBody, BridgeError> {
    let kind = kind.unwrap_or_else(|| match &body {
        ResponseBody::Text(_) => BodyKind::Text,
        ResponseBody::Binary(bytes) if bytes.is_empty() => BodyKind::Text,
        ResponseBody::Binary(_) => classifier.classify(headers),
    });

    let body = match (kind, body) {
        (BodyKind::Text, ResponseBody::Text(text)) => text,
        (BodyKind::Text, ResponseBody::Binary(bytes)) => String::from_utf8(bytes).map_err(|e| {
            BridgeError::Encoding(format!("response body classified as text is not valid UTF-8: {e}"))
        })?,
        (BodyKind::Binary, ResponseBody::Text(text)) => STANDARD.encode(text),
        (BodyKind::Binary, ResponseBody::Binary(bytes)) => STANDARD.encode(bytes),
    };

    Ok(EncodedBody { kind, body })
}

//! Error types for the bridge.
//!
//! Every error is terminal for the current invocation. Dispatcher failures are wrapped
//! transparently so their message and source chain reach the platform untouched.

use lambda_runtime::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required field (path, or the payload itself) could not be resolved from the event.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
    /// A body could not be decoded or encoded according to its classification.
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// The dispatcher failed; passed through as-is.
    #[error(transparent)]
    Dispatch(anyhow::Error),
}

impl BridgeError {
    /// Name reported as the Lambda `errorType`.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::MalformedEvent(_) => "MalformedEvent",
            Self::Encoding(_) => "EncodingError",
            Self::Dispatch(_) => "DispatchError",
        }
    }
}

impl From<BridgeError> for Diagnostic {
    fn from(error: BridgeError) -> Self {
        Self {
            error_type: error.error_type().to_string(),
            error_message: format!("{error:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_carries_error_type() {
        let diagnostic = Diagnostic::from(BridgeError::MalformedEvent("missing path".to_string()));
        assert_eq!(diagnostic.error_type, "MalformedEvent");
        assert_eq!(diagnostic.error_message, "Malformed event: missing path");
    }

    #[test]
    fn test_dispatch_error_is_transparent() {
        let error = BridgeError::Dispatch(anyhow::anyhow!("upstream refused connection"));
        assert_eq!(error.to_string(), "upstream refused connection");
        assert_eq!(Diagnostic::from(error).error_type, "DispatchError");
    }
}

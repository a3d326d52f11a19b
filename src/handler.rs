use lambda_runtime::tracing::{debug, error, info};
use lambda_runtime::{Context, Diagnostic, LambdaEvent};
use serde_json::Value;

use crate::http::{DispatchRequest, Dispatcher};
use crate::models::{BridgeError, InboundEvent, OutboundResult};
use crate::normalize::{BodyClassifier, ContentTypeClassifier, normalize_request, normalize_response};

/// Translates platform events for one application runtime.
///
/// The dispatcher is held by the bridge rather than by process-wide state, so any number of
/// bridges (one per test, for instance) can coexist.
pub struct Bridge<D, C = ContentTypeClassifier> {
    dispatcher: D,
    classifier: C,
}

impl<D: Dispatcher> Bridge<D> {
    /// Creates a bridge using the content-type based body classifier.
    pub const fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            classifier: ContentTypeClassifier,
        }
    }
}

impl<D: Dispatcher, C: BodyClassifier> Bridge<D, C> {
    pub const fn with_classifier(dispatcher: D, classifier: C) -> Self {
        Self {
            dispatcher,
            classifier,
        }
    }

    /// Runs one invocation: normalize the event, dispatch it, normalize the response.
    ///
    /// # Errors
    ///
    /// - `MalformedEvent`: the payload is not a recognizable event or has no path
    /// - `Encoding`: a request or response body could not be decoded/encoded
    /// - `Dispatch`: the dispatcher failed; its error is passed through unchanged
    pub async fn handle(&self, payload: Value, context: Context) -> Result<OutboundResult, BridgeError> {
        debug!(payload = ?payload, "Received invocation event");

        let event = InboundEvent::from_value(&payload)?;
        let shape = event.shape();
        let request = normalize_request(&event)?;

        info!(
            shape = %shape,
            method = %request.method,
            path = %request.path,
            request_id = %context.request_id,
            "Dispatching request"
        );

        let response = self
            .dispatcher
            .dispatch(DispatchRequest {
                request,
                context,
                event: payload,
            })
            .await
            .map_err(BridgeError::Dispatch)?;

        let result = normalize_response(response, shape, &self.classifier)?;

        info!(
            status = result.status_code(),
            base64 = result.is_base64_encoded(),
            "Returning result"
        );

        Ok(result)
    }

    /// Lambda entry point. Converts failures into a `Diagnostic` for the platform.
    ///
    /// # Errors
    ///
    /// Returns a `Diagnostic` with one of the following types:
    ///
    /// - `MalformedEvent`: required event fields could not be resolved
    /// - `EncodingError`: a body could not be decoded or encoded
    /// - `DispatchError`: the application runtime failed
    pub async fn function_handler(&self, event: LambdaEvent<Value>) -> Result<Value, Diagnostic> {
        let (payload, context) = event.into_parts();

        let result = self.handle(payload, context).await.map_err(|e| {
            error!(error = %e, error_type = e.error_type(), "Invocation failed");
            Diagnostic::from(e)
        })?;

        serde_json::to_value(result).map_err(|e| {
            error!(error = %e, "Failed to serialize result");
            Diagnostic {
                error_type: "EncodingError".to_string(),
                error_message: format!("Failed to serialize result: {e}"),
            }
        })
    }
}

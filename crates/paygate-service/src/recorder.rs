//! Sink for dispatched webhook events.
//!
//! Recognized events currently have no business action attached; they are
//! only recorded. The recorder is the place to hang future handlers.

use serde_json::Value;

use paygate_core::WebhookEventType;

/// Receives every webhook event that passed verification and dispatch.
pub trait EventRecorder: Send + Sync {
    /// Record one dispatched event and its data object.
    fn record(&self, event_type: &WebhookEventType, object: &Value);
}

/// Records events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRecorder;

impl EventRecorder for LogRecorder {
    fn record(&self, event_type: &WebhookEventType, object: &Value) {
        tracing::debug!(
            event_type = %event_type,
            object = %object,
            "Webhook event payload"
        );
    }
}

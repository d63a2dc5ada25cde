//! Stripe webhook handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use paygate_core::{WebhookEvent, WebhookEventType};

use crate::error::ApiError;
use crate::recorder::EventRecorder;
use crate::state::AppState;
use crate::stripe::SIGNATURE_HEADER;

/// Unverified webhook body, read only when no signing secret is configured.
#[derive(Debug, Default, Deserialize)]
struct UnverifiedWebhook {
    #[serde(rename = "type", default)]
    event_type: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Handle Stripe webhooks.
///
/// The body is taken as raw bytes: the signature covers the exact bytes sent,
/// so it must not be parsed and re-encoded before verification. Every
/// outcome is a bare status with an empty body.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(verifier) = &state.webhook_verifier else {
        // No webhook_secret configured - skip verification (development mode)
        let unverified = match parse_unverified(&body) {
            Ok(unverified) => unverified,
            Err(e) => {
                tracing::warn!(error = %e, "Unverified webhook body is not JSON");
                return StatusCode::BAD_REQUEST;
            }
        };

        tracing::warn!(
            event_type = ?unverified.event_type,
            "Received unverified webhook (no signing secret configured)"
        );
        tracing::debug!(data = ?unverified.data, "Unverified webhook data");

        return StatusCode::OK;
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let event = match verifier.construct_event(&body, signature) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            return StatusCode::BAD_REQUEST;
        }
    };

    match dispatch(state.recorder.as_ref(), &event) {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::BAD_REQUEST,
    }
}

/// Parse an unverified body; an empty body reads as `{}`.
fn parse_unverified(body: &[u8]) -> serde_json::Result<UnverifiedWebhook> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UnverifiedWebhook::default());
    }
    serde_json::from_slice(body)
}

/// Dispatch a verified event on its type tag.
///
/// Every recognized type is logged and handed to the recorder; no further
/// action is taken yet. Unrecognized types are rejected without side effects.
pub fn dispatch(
    recorder: &dyn EventRecorder,
    event: &WebhookEvent,
) -> Result<WebhookEventType, ApiError> {
    let kind = event.kind();
    let object = &event.data.object;
    let object_id = object.get("id").and_then(Value::as_str).unwrap_or("unknown");
    let event_id = event.id.as_deref().unwrap_or("unknown");

    match &kind {
        WebhookEventType::CustomerCreated => {
            tracing::info!(event_id, customer_id = %object_id, "Customer created");
        }
        WebhookEventType::CustomerUpdated => {
            tracing::info!(event_id, customer_id = %object_id, "Customer updated");
        }
        WebhookEventType::InvoiceUpcoming => {
            tracing::info!(event_id, customer_id = ?object.get("customer"), "Invoice upcoming");
        }
        WebhookEventType::InvoiceCreated => {
            tracing::info!(event_id, invoice_id = %object_id, "Invoice created");
        }
        WebhookEventType::InvoiceFinalized => {
            tracing::info!(event_id, invoice_id = %object_id, "Invoice finalized");
        }
        WebhookEventType::InvoicePaymentSucceeded => {
            tracing::info!(event_id, invoice_id = %object_id, "Invoice payment succeeded");
        }
        WebhookEventType::InvoicePaymentFailed => {
            tracing::warn!(
                event_id,
                invoice_id = %object_id,
                "Invoice payment failed - customer may need to update payment method"
            );
        }
        WebhookEventType::SubscriptionCreated => {
            let status = object.get("status").and_then(Value::as_str);
            tracing::info!(
                event_id,
                subscription_id = %object_id,
                status = ?status,
                "Subscription created"
            );
        }
        WebhookEventType::Unrecognized(tag) => {
            tracing::warn!(event_id, event_type = %tag, "Unexpected webhook event type");
            return Err(ApiError::BadRequest(format!("Unhandled event type: {tag}")));
        }
    }

    recorder.record(&kind, object);
    Ok(kind)
}

//! API handlers.
//!
//! Provider results are relayed verbatim. On the routes that relay failures,
//! the provider's error object becomes the response body with status 200;
//! callers distinguish it by its `type`/`message` shape.

pub mod assets;
pub mod customers;
pub mod health;
pub mod invoices;
pub mod subscriptions;
pub mod webhooks;

use std::str::FromStr;

use axum::Json;
use serde_json::Value;

use paygate_core::{GatewayError, IdError};

use crate::error::ApiError;
use crate::stripe::StripeError;

/// Parse a required identifier field.
pub(crate) fn require_id<T>(value: Option<String>, field: &'static str) -> Result<T, ApiError>
where
    T: FromStr<Err = IdError>,
{
    let value = value.ok_or(GatewayError::MissingField { field })?;
    value.parse().map_err(|source| match source {
        IdError::Empty => GatewayError::MissingField { field }.into(),
    })
}

/// Require a non-blank text field.
pub(crate) fn require_text(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(GatewayError::MissingField { field }.into()),
    }
}

/// Relay a provider result, logging failures and echoing them as the body.
pub(crate) fn relay(operation: &'static str, result: Result<Value, StripeError>) -> Json<Value> {
    match result {
        Ok(value) => {
            tracing::debug!(operation, body = %value, "Provider call succeeded");
            Json(value)
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "Provider call failed, relaying error");
            Json(e.relay_body())
        }
    }
}

/// Convert a provider failure on a path without explicit relay into a 500.
pub(crate) fn unhandled(operation: &'static str) -> impl FnOnce(StripeError) -> ApiError {
    move |e| ApiError::Internal(format!("{operation}: {e}"))
}

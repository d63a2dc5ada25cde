//! Invoice handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use paygate_core::{CustomerId, InvoiceId};

use super::{relay, require_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Upcoming invoice request.
#[derive(Debug, Deserialize)]
pub struct UpcomingInvoiceRequest {
    /// Customer ID.
    pub customer: Option<String>,
}

/// Preview the customer's next invoice.
pub async fn upcoming_invoice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpcomingInvoiceRequest>,
) -> Result<Json<Value>, ApiError> {
    let customer: CustomerId = require_id(request.customer, "customer")?;
    let result = state.provider()?.upcoming_invoice(&customer).await;
    Ok(relay("upcoming invoice", result))
}

/// Invoice lookup request.
#[derive(Debug, Deserialize)]
pub struct InvoiceRequest {
    /// Invoice ID.
    pub invoice: Option<String>,
}

/// Fetch a stored invoice.
pub async fn retrieve_invoice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvoiceRequest>,
) -> Result<Json<Value>, ApiError> {
    let invoice: InvoiceId = require_id(request.invoice, "invoice")?;
    let result = state.provider()?.retrieve_invoice(&invoice).await;
    Ok(relay("retrieve invoice", result))
}

//! Customer handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use paygate_core::{CustomerId, GatewayError, PaymentMethodId};

use super::{relay, require_id, require_text, unhandled};
use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::{CustomerParams, SubscriptionParams};

/// Create customer request.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Payment method collected by the web client.
    pub payment_method: Option<String>,
    /// Customer email.
    pub email: Option<String>,
}

/// Create a customer and subscribe them to the configured plan.
///
/// There is no lookup for an existing customer with the same email; every
/// call creates a new remote customer. If the subscription call fails, the
/// customer created before it stays in place.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Json<Value>, ApiError> {
    let payment_method: PaymentMethodId = require_id(request.payment_method, "payment_method")?;
    let email = require_text(request.email, "email")?;
    let plan = state.plan_id()?;
    let provider = state.provider()?;

    let customer = provider
        .create_customer(&CustomerParams {
            payment_method,
            email,
        })
        .await
        .map_err(unhandled("create customer"))?;

    let customer_id = customer
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::UnexpectedShape("customer without id".into()))
        .and_then(|id| {
            CustomerId::new(id)
                .map_err(|e| GatewayError::UnexpectedShape(format!("customer id: {e}")))
        })?;

    tracing::info!(customer_id = %customer_id, plan_id = %plan, "Customer created, subscribing");

    let subscription = provider
        .create_subscription(&SubscriptionParams::new(customer_id.clone(), plan))
        .await
        .map_err(unhandled("create subscription"))?;

    let subscription_id = subscription.get("id").and_then(Value::as_str);
    let status = subscription.get("status").and_then(Value::as_str);
    tracing::info!(
        customer_id = %customer_id,
        subscription_id = ?subscription_id,
        status = ?status,
        "Subscription created"
    );

    Ok(Json(subscription))
}

/// Customer lookup request.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    /// Customer ID.
    pub customer: Option<String>,
}

/// Fetch a customer.
pub async fn customer_details(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<Value>, ApiError> {
    let customer: CustomerId = require_id(request.customer, "customer")?;
    let result = state.provider()?.retrieve_customer(&customer).await;
    Ok(relay("retrieve customer", result))
}

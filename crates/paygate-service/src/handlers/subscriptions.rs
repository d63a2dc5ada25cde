//! Subscription handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use paygate_core::{GatewayError, Subscription, SubscriptionId};

use super::{relay, require_id, unhandled};
use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::SubscriptionUpdate;

/// Request naming a subscription as `subscriptionId`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionIdRequest {
    /// Subscription ID.
    pub subscription_id: Option<String>,
}

/// Request naming a subscription as `subscription`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    /// Subscription ID.
    pub subscription: Option<String>,
}

/// Fetch a subscription, live.
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscriptionIdRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: SubscriptionId = require_id(request.subscription_id, "subscriptionId")?;
    let subscription = state
        .provider()?
        .retrieve_subscription(&id)
        .await
        .map_err(unhandled("retrieve subscription"))?;
    Ok(Json(subscription))
}

/// Fetch a subscription, logging its lifecycle status.
pub async fn subscription_details(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: SubscriptionId = require_id(request.subscription, "subscription")?;
    let result = state.provider()?.retrieve_subscription(&id).await;

    if let Ok(value) = &result {
        match Subscription::from_value(value) {
            Ok(view) => tracing::info!(
                subscription_id = %view.id,
                status = %view.status,
                cancel_at_period_end = view.cancel_at_period_end,
                "Subscription details"
            ),
            Err(e) => tracing::warn!(subscription_id = %id, error = %e, "Unreadable subscription"),
        }
    }

    Ok(relay("retrieve subscription", result))
}

/// Cancel a subscription immediately.
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: SubscriptionId = require_id(request.subscription, "subscription")?;
    tracing::info!(subscription_id = %id, "Deleting subscription");
    let result = state.provider()?.delete_subscription(&id).await;
    Ok(relay("delete subscription", result))
}

/// Keep a subscription active until the period ends, then stop renewing.
pub async fn cancel_at_period_end(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: SubscriptionId = require_id(request.subscription, "subscription")?;
    tracing::info!(subscription_id = %id, "Cancelling subscription at period end");
    let result = state
        .provider()?
        .update_subscription(&id, &SubscriptionUpdate::cancel_at_period_end())
        .await;
    Ok(relay("cancel subscription", result))
}

/// Undo a pending cancel-at-period-end.
///
/// The update must resubmit the first item's current plan together with the
/// cleared flag, so the subscription is fetched first.
pub async fn reactivate_subscription(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id: SubscriptionId = require_id(request.subscription, "subscription")?;
    let provider = state.provider()?;

    let current = provider
        .retrieve_subscription(&id)
        .await
        .map_err(unhandled("retrieve subscription"))?;

    let view = Subscription::from_value(&current)
        .map_err(|e| GatewayError::UnexpectedShape(format!("subscription: {e}")))?;

    let item = view
        .first_item()
        .ok_or_else(|| GatewayError::UnexpectedShape(format!("subscription {id} has no items")))?;

    let plan = item.plan.as_ref().ok_or_else(|| {
        GatewayError::UnexpectedShape(format!("subscription item {} has no plan", item.id))
    })?;

    tracing::info!(
        subscription_id = %id,
        item_id = %item.id,
        plan_id = %plan.id,
        "Reactivating subscription"
    );

    let update = SubscriptionUpdate::reactivate(item.id.clone(), plan.id.clone());
    let result = provider.update_subscription(&id, &update).await;
    Ok(relay("reactivate subscription", result))
}

//! Request and response types for the paygate client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use paygate_core::{CustomerId, InvoiceId, PaymentMethodId, SubscriptionId};

/// Body of `POST /create-customer`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerRequest<'a> {
    /// Payment method collected by the web client.
    pub payment_method: &'a PaymentMethodId,
    /// Customer email.
    pub email: &'a str,
}

/// Body naming a subscription as `subscriptionId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionIdRequest<'a> {
    /// Subscription ID.
    pub subscription_id: &'a SubscriptionId,
}

/// Body naming a subscription as `subscription`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRequest<'a> {
    /// Subscription ID.
    pub subscription: &'a SubscriptionId,
}

/// Body naming a customer.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRequest<'a> {
    /// Customer ID.
    pub customer: &'a CustomerId,
}

/// Body naming an invoice.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest<'a> {
    /// Invoice ID.
    pub invoice: &'a InvoiceId,
}

/// Response of `GET /public-key`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// Publishable key, if the gateway has one configured.
    pub public_key: Option<String>,
}

/// Gateway error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorDetail,
}

/// Gateway error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// A provider error object relayed with a success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedProviderError {
    /// Provider error type.
    pub error_type: String,
    /// Provider message.
    pub message: String,
    /// Provider error code.
    pub code: Option<String>,
}

impl RelayedProviderError {
    /// Recognize a relayed failure: a `type` ending in `error`, a `message`,
    /// and no `object` tag.
    #[must_use]
    pub fn detect(body: &Value) -> Option<Self> {
        if body.get("object").is_some() {
            return None;
        }
        let error_type = body.get("type")?.as_str()?;
        if !error_type.ends_with("error") {
            return None;
        }
        let message = body.get("message")?.as_str()?;
        Some(Self {
            error_type: error_type.to_string(),
            message: message.to_string(),
            code: body.get("code").and_then(Value::as_str).map(str::to_string),
        })
    }
}

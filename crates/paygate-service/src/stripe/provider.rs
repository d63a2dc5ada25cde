//! The billing provider seam.
//!
//! Handlers talk to the provider through this trait so the gateway can be
//! exercised without network access. Every method returns the provider's
//! JSON object untouched; callers relay it as-is.

use async_trait::async_trait;
use serde_json::Value;

use paygate_core::{CustomerId, InvoiceId, SubscriptionId};

use super::client::StripeError;
use super::types::{CustomerParams, SubscriptionParams, SubscriptionUpdate};

/// Remote billing operations used by the gateway.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a customer.
    async fn create_customer(&self, params: &CustomerParams) -> Result<Value, StripeError>;

    /// Create a subscription.
    async fn create_subscription(&self, params: &SubscriptionParams)
        -> Result<Value, StripeError>;

    /// Fetch a subscription.
    async fn retrieve_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError>;

    /// Fetch a customer.
    async fn retrieve_customer(&self, id: &CustomerId) -> Result<Value, StripeError>;

    /// Preview the customer's next invoice.
    async fn upcoming_invoice(&self, customer: &CustomerId) -> Result<Value, StripeError>;

    /// Fetch an invoice.
    async fn retrieve_invoice(&self, id: &InvoiceId) -> Result<Value, StripeError>;

    /// Cancel a subscription immediately.
    async fn delete_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError>;

    /// Update a subscription.
    async fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<Value, StripeError>;
}

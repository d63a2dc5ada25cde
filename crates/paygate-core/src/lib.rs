//! Core types for the paygate billing gateway.
//!
//! The gateway holds no state of its own; the billing provider owns every
//! customer, subscription and invoice. This crate only provides the typed
//! views the gateway and its clients need to inspect provider payloads:
//!
//! - **Identifiers**: `CustomerId`, `SubscriptionId`, `SubscriptionItemId`,
//!   `InvoiceId`, `PlanId`, `PaymentMethodId`
//! - **Subscriptions**: `Subscription`, `SubscriptionItem`, `SubscriptionStatus`
//! - **Webhooks**: `WebhookEvent`, `WebhookEventType`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod events;
pub mod ids;
pub mod subscription;

pub use error::{GatewayError, Result};
pub use events::{WebhookEvent, WebhookEventData, WebhookEventType};
pub use ids::{
    CustomerId, IdError, InvoiceId, PaymentMethodId, PlanId, SubscriptionId, SubscriptionItemId,
};
pub use subscription::{
    ItemList, PlanRef, Subscription, SubscriptionItem, SubscriptionStatus,
};

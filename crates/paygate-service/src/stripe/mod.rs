//! Stripe integration.
//!
//! Stripe is the system of record for everything the gateway touches:
//! - Customers and their default payment methods
//! - Subscriptions and their line items
//! - Invoices, stored and upcoming
//! - Signed webhook deliveries

pub mod client;
pub mod provider;
pub mod types;
pub mod webhook;

pub use client::{StripeClient, StripeError};
pub use provider::BillingProvider;
pub use types::*;
pub use webhook::{WebhookError, WebhookVerifier, SIGNATURE_HEADER};

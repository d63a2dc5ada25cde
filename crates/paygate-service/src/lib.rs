//! Paygate HTTP API Service.
//!
//! A stateless relay between a web client and Stripe:
//!
//! - Customer creation with an initial subscription
//! - Subscription, customer and invoice lookups
//! - Cancellation, cancel-at-period-end and reactivation
//! - Signed Stripe webhooks
//!
//! Stripe is the system of record. The gateway keeps nothing between
//! requests; every response is the provider's object, relayed verbatim.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for the Handler trait

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod recorder;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use recorder::{EventRecorder, LogRecorder};
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{BillingProvider, StripeClient, StripeError, WebhookVerifier};

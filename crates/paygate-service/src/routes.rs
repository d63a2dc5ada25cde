//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{assets, customers, health, invoices, subscriptions, webhooks};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Web client
/// - `GET /` - `index.html` from the static directory
/// - `GET /public-key` - Stripe publishable key
/// - any other unmatched path - served from the static directory
///
/// ## Billing relay (JSON bodies, Stripe objects relayed verbatim)
/// - `POST /create-customer` - Create customer and subscribe to the default plan
/// - `POST /subscription` - Fetch subscription (`subscriptionId`)
/// - `POST /customerDetails` - Fetch customer
/// - `POST /subscriptionDetails` - Fetch subscription (`subscription`)
/// - `POST /upcomingInvoice` - Preview next invoice
/// - `POST /retrieveInvoice` - Fetch invoice
/// - `POST /deleteSubscription` - Cancel immediately
/// - `POST /cancelingSubscription` - Cancel at period end
/// - `POST /reActivateSubscription` - Undo cancel at period end
///
/// ## Webhooks (Signature verification)
/// - `POST /webhook` - Stripe webhooks
///
/// ## Ops
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let static_dir = state.config.static_dir.clone();
    let index = state.config.index_path();

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Web client
        .route_service("/", ServeFile::new(index))
        .route("/public-key", get(assets::public_key))
        .route("/health", get(health::health))
        // Billing relay
        .route("/create-customer", post(customers::create_customer))
        .route("/subscription", post(subscriptions::get_subscription))
        .route("/customerDetails", post(customers::customer_details))
        .route(
            "/subscriptionDetails",
            post(subscriptions::subscription_details),
        )
        .route("/upcomingInvoice", post(invoices::upcoming_invoice))
        .route("/retrieveInvoice", post(invoices::retrieve_invoice))
        .route(
            "/deleteSubscription",
            post(subscriptions::delete_subscription),
        )
        .route(
            "/cancelingSubscription",
            post(subscriptions::cancel_at_period_end),
        )
        .route(
            "/reActivateSubscription",
            post(subscriptions::reactivate_subscription),
        )
        // Webhooks
        .route("/webhook", post(webhooks::webhook))
        // Remaining static assets
        .fallback_service(ServeDir::new(static_dir))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}


//! Publishable key for the web client.
//!
//! `GET /` and the rest of the static directory are mounted in `routes`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Publishable key response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// Stripe publishable key, `null` when not configured.
    pub public_key: Option<String>,
}

/// Return the publishable key the web client initializes Stripe.js with.
pub async fn public_key(State(state): State<Arc<AppState>>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.config.stripe_publishable_key.clone(),
    })
}

//! Application state.

use std::sync::Arc;

use paygate_core::{GatewayError, PlanId};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::recorder::{EventRecorder, LogRecorder};
use crate::stripe::{BillingProvider, StripeClient, WebhookVerifier};

/// Application state shared across handlers.
///
/// Everything here is read-only after startup; handlers never share mutable
/// state across requests.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Billing provider (absent when no secret key is configured).
    pub provider: Option<Arc<dyn BillingProvider>>,

    /// Webhook verifier (absent when no signing secret is configured).
    pub webhook_verifier: Option<WebhookVerifier>,

    /// Sink for dispatched webhook events.
    pub recorder: Arc<dyn EventRecorder>,
}

impl AppState {
    /// Create a new application state, building the Stripe client from config.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let provider = config.stripe_secret_key.as_ref().and_then(|key| {
            match StripeClient::with_base_url(key, &config.stripe_api_base) {
                Ok(client) => {
                    tracing::info!(api_base = %config.stripe_api_base, "Stripe integration enabled");
                    Some(Arc::new(client) as Arc<dyn BillingProvider>)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create Stripe client");
                    None
                }
            }
        });

        if provider.is_none() {
            tracing::warn!("Stripe not configured - billing routes will answer 503");
        }

        Self::with_provider(config, provider)
    }

    /// Create a new application state around an existing provider.
    #[must_use]
    pub fn with_provider(
        config: ServiceConfig,
        provider: Option<Arc<dyn BillingProvider>>,
    ) -> Self {
        let webhook_verifier = config.stripe_webhook_secret.as_ref().map(|secret| {
            WebhookVerifier::with_tolerance(secret.clone(), config.webhook_tolerance_seconds)
        });

        if webhook_verifier.is_none() {
            tracing::warn!(
                "Stripe webhook_secret not configured - webhook signatures will not be verified"
            );
        }

        if config.subscription_plan_id.is_none() {
            tracing::warn!("Subscription plan not configured - create-customer will answer 503");
        }

        Self {
            config,
            provider,
            webhook_verifier,
            recorder: Arc::new(LogRecorder),
        }
    }

    /// Replace the webhook event recorder.
    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Get the provider or fail with 503.
    pub fn provider(&self) -> Result<&dyn BillingProvider, ApiError> {
        self.provider
            .as_deref()
            .ok_or_else(|| ApiError::NotConfigured("Stripe not configured".into()))
    }

    /// Get the configured plan or fail with 503.
    pub fn plan_id(&self) -> Result<PlanId, ApiError> {
        let raw = self
            .config
            .subscription_plan_id
            .as_deref()
            .ok_or_else(|| GatewayError::Configuration("subscription plan not configured".into()))?;
        PlanId::new(raw)
            .map_err(|e| GatewayError::Configuration(format!("subscription plan: {e}")).into())
    }
}

//! Stripe API client implementation.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{json, Value};
use std::time::Duration;

use paygate_core::{CustomerId, InvoiceId, SubscriptionId};

use super::provider::BillingProvider;
use super::types::{
    CustomerParams, StripeErrorResponse, SubscriptionParams, SubscriptionUpdate,
};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
        /// Parameter that caused the error.
        param: Option<String>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An identifier that cannot name a resource.
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl StripeError {
    /// The failure object relayed to callers in place of a provider result.
    #[must_use]
    pub fn relay_body(&self) -> Value {
        match self {
            Self::Api {
                status,
                error_type,
                message,
                code,
                param,
            } => json!({
                "type": error_type,
                "message": message,
                "code": code,
                "param": param,
                "statusCode": status,
            }),
            Self::Http(e) => json!({
                "type": "connection_error",
                "message": e.to_string(),
            }),
            Self::Serialization(e) => json!({
                "type": "invalid_response_error",
                "message": e.to_string(),
            }),
            Self::Configuration(msg) => json!({
                "type": "configuration_error",
                "message": msg,
            }),
            Self::InvalidIdentifier(id) => json!({
                "type": "invalid_request_error",
                "message": format!("Invalid identifier: '{id}'"),
            }),
        }
    }
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl StripeClient {
    /// Stripe API base URL.
    pub const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client against the public API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::with_base_url(api_key, Self::BASE_URL)
    }

    /// Create a new Stripe client against a custom base URL (mocks, proxies).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, StripeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StripeError::Configuration("empty API key".into()));
        }

        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| StripeError::Configuration(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StripeError::Configuration(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Append `segments` to the base URL, each percent-encoded as one segment.
    ///
    /// Identifiers come from request bodies; `/`, `?` and `#` inside them are
    /// escaped, and dot segments are refused so a lookup cannot leave its
    /// collection.
    fn url(&self, segments: &[&str]) -> Result<Url, StripeError> {
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(StripeError::InvalidIdentifier((*dots).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StripeError::Configuration("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, StripeError> {
        Ok(self
            .client
            .request(method, self.url(segments)?)
            .basic_auth(&self.api_key, Option::<&str>::None))
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder, StripeError> {
        self.request(Method::GET, segments)
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder, StripeError> {
        self.request(Method::POST, segments)
    }

    fn delete(&self, segments: &[&str]) -> Result<RequestBuilder, StripeError> {
        self.request(Method::DELETE, segments)
    }

    /// Send a request and convert errors.
    async fn send(&self, request: RequestBuilder) -> Result<Value, StripeError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
                param: stripe_error.error.param,
            }),
            Err(_) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
                param: None,
            }),
        }
    }
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn create_customer(&self, params: &CustomerParams) -> Result<Value, StripeError> {
        tracing::debug!(email = %params.email, "Creating Stripe customer");
        self.send(self.post(&["customers"])?.form(&params.to_form()))
            .await
    }

    async fn create_subscription(
        &self,
        params: &SubscriptionParams,
    ) -> Result<Value, StripeError> {
        tracing::debug!(
            customer_id = %params.customer,
            plan_id = %params.plan,
            "Creating Stripe subscription"
        );
        self.send(self.post(&["subscriptions"])?.form(&params.to_form()))
            .await
    }

    async fn retrieve_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError> {
        self.send(self.get(&["subscriptions", id.as_str()])?).await
    }

    async fn retrieve_customer(&self, id: &CustomerId) -> Result<Value, StripeError> {
        self.send(self.get(&["customers", id.as_str()])?).await
    }

    async fn upcoming_invoice(&self, customer: &CustomerId) -> Result<Value, StripeError> {
        self.send(
            self.get(&["invoices", "upcoming"])?
                .query(&[("customer", customer.as_str())]),
        )
        .await
    }

    async fn retrieve_invoice(&self, id: &InvoiceId) -> Result<Value, StripeError> {
        self.send(self.get(&["invoices", id.as_str()])?).await
    }

    async fn delete_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError> {
        self.send(self.delete(&["subscriptions", id.as_str()])?).await
    }

    async fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<Value, StripeError> {
        self.send(
            self.post(&["subscriptions", id.as_str()])?
                .form(&update.to_form()),
        )
        .await
    }
}

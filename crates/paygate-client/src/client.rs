//! Paygate HTTP client implementation.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use paygate_core::{
    CustomerId, InvoiceId, PaymentMethodId, Subscription, SubscriptionId, SubscriptionStatus,
};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CreateCustomerRequest, CustomerRequest, InvoiceRequest, PublicKeyResponse,
    RelayedProviderError, SubscriptionIdRequest, SubscriptionRequest,
};

/// Paygate API client.
///
/// Provider objects come back as raw JSON, exactly as the gateway relays
/// them.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new paygate client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the gateway (e.g., `"http://localhost:4242"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new paygate client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("empty base URL".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Fetch the publishable key for the payment form.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway returns an error.
    pub async fn public_key(&self) -> Result<Option<String>, ClientError> {
        let url = format!("{}/public-key", self.base_url);
        let response = self.client.get(&url).send().await?;
        let body: PublicKeyResponse = self.handle_response(response).await?;
        Ok(body.public_key)
    }

    /// Create a customer and subscribe it to the gateway's default plan.
    ///
    /// Not idempotent: every call creates a new customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway returns an error.
    pub async fn create_customer(
        &self,
        payment_method: &PaymentMethodId,
        email: &str,
    ) -> Result<Value, ClientError> {
        self.post(
            "/create-customer",
            &CreateCustomerRequest {
                payment_method,
                email,
            },
        )
        .await
    }

    /// Fetch a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway returns an error.
    pub async fn subscription(&self, id: &SubscriptionId) -> Result<Value, ClientError> {
        self.post("/subscription", &SubscriptionIdRequest { subscription_id: id })
            .await
    }

    /// Fetch a subscription and return only its lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the subscription cannot be read.
    pub async fn subscription_status(
        &self,
        id: &SubscriptionId,
    ) -> Result<SubscriptionStatus, ClientError> {
        let value = self.subscription(id).await?;
        Ok(Subscription::from_value(&value)?.status)
    }

    /// Fetch a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn customer_details(&self, customer: &CustomerId) -> Result<Value, ClientError> {
        self.post("/customerDetails", &CustomerRequest { customer })
            .await
    }

    /// Fetch a subscription through the relaying route.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn subscription_details(&self, id: &SubscriptionId) -> Result<Value, ClientError> {
        self.post("/subscriptionDetails", &SubscriptionRequest { subscription: id })
            .await
    }

    /// Preview a customer's next invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn upcoming_invoice(&self, customer: &CustomerId) -> Result<Value, ClientError> {
        self.post("/upcomingInvoice", &CustomerRequest { customer })
            .await
    }

    /// Fetch an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn retrieve_invoice(&self, invoice: &InvoiceId) -> Result<Value, ClientError> {
        self.post("/retrieveInvoice", &InvoiceRequest { invoice })
            .await
    }

    /// Cancel a subscription immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn delete_subscription(&self, id: &SubscriptionId) -> Result<Value, ClientError> {
        self.post("/deleteSubscription", &SubscriptionRequest { subscription: id })
            .await
    }

    /// Stop renewing a subscription at the end of its current period.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider call failed.
    pub async fn cancel_subscription_at_period_end(
        &self,
        id: &SubscriptionId,
    ) -> Result<Value, ClientError> {
        self.post(
            "/cancelingSubscription",
            &SubscriptionRequest { subscription: id },
        )
        .await
    }

    /// Undo a pending cancel-at-period-end.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway returns an error.
    pub async fn reactivate_subscription(
        &self,
        id: &SubscriptionId,
    ) -> Result<Value, ClientError> {
        self.post(
            "/reActivateSubscription",
            &SubscriptionRequest { subscription: id },
        )
        .await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let url = format!("{}{path}", self.base_url);

        let response = self.client.post(&url).json(body).send().await?;
        let value: Value = self.handle_response(response).await?;

        if let Some(relayed) = RelayedProviderError::detect(&value) {
            tracing::debug!(
                path,
                error_type = %relayed.error_type,
                "Gateway relayed a provider error"
            );
            return Err(ClientError::Provider {
                error_type: relayed.error_type,
                message: relayed.message,
                code: relayed.code,
            });
        }

        Ok(value)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => Err(ClientError::Api {
                code: api_error.error.code,
                message: api_error.error.message,
                status: status.as_u16(),
            }),
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

//! Common test utilities for paygate integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use paygate_core::{CustomerId, InvoiceId, SubscriptionId, WebhookEventType};
use paygate_service::stripe::{CustomerParams, SubscriptionParams, SubscriptionUpdate};
use paygate_service::{
    create_router, AppState, BillingProvider, EventRecorder, ServiceConfig, StripeError,
};

pub const PLAN_ID: &str = "plan_one_day";
pub const PUBLISHABLE_KEY: &str = "pk_test_paygate";
pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";
pub const INDEX_HTML: &str = "<!doctype html><title>paygate</title>";

/// One call made against the fake provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateCustomer(CustomerParams),
    CreateSubscription(SubscriptionParams),
    RetrieveSubscription(String),
    RetrieveCustomer(String),
    UpcomingInvoice(String),
    RetrieveInvoice(String),
    DeleteSubscription(String),
    UpdateSubscription(String, SubscriptionUpdate),
}

/// In-process provider that records calls and serves seeded objects.
#[derive(Default)]
pub struct FakeProvider {
    calls: Mutex<Vec<Call>>,
    subscriptions: Mutex<HashMap<String, Value>>,
    customers: Mutex<HashMap<String, Value>>,
    fail_subscription_creation: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `create_subscription` call fail.
    pub fn failing_subscription_creation() -> Self {
        Self {
            fail_subscription_creation: true,
            ..Self::default()
        }
    }

    pub fn seed_subscription(&self, subscription: Value) {
        let id = subscription["id"].as_str().unwrap().to_string();
        self.subscriptions.lock().unwrap().insert(id, subscription);
    }

    pub fn seed_customer(&self, customer: Value) {
        let id = customer["id"].as_str().unwrap().to_string();
        self.customers.lock().unwrap().insert(id, customer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn not_found(kind: &str, id: &str) -> StripeError {
    StripeError::Api {
        status: 404,
        error_type: "invalid_request_error".into(),
        message: format!("No such {kind}: '{id}'"),
        code: Some("resource_missing".into()),
        param: Some("id".into()),
    }
}

/// A subscription with one line item on `plan`.
pub fn subscription_fixture(id: &str, item_id: &str, plan: &str, cancel_at_period_end: bool) -> Value {
    json!({
        "id": id,
        "object": "subscription",
        "status": "active",
        "cancel_at_period_end": cancel_at_period_end,
        "customer": "cus_fixture",
        "items": {
            "object": "list",
            "data": [
                { "id": item_id, "object": "subscription_item", "plan": { "id": plan, "object": "plan" } }
            ]
        }
    })
}

#[async_trait]
impl BillingProvider for FakeProvider {
    async fn create_customer(&self, params: &CustomerParams) -> Result<Value, StripeError> {
        self.push(Call::CreateCustomer(params.clone()));
        let id = format!("cus_{}", uuid::Uuid::new_v4().simple());
        Ok(json!({
            "id": id,
            "object": "customer",
            "email": params.email,
            "invoice_settings": { "default_payment_method": params.payment_method.as_str() }
        }))
    }

    async fn create_subscription(
        &self,
        params: &SubscriptionParams,
    ) -> Result<Value, StripeError> {
        self.push(Call::CreateSubscription(params.clone()));
        if self.fail_subscription_creation {
            return Err(StripeError::Api {
                status: 402,
                error_type: "card_error".into(),
                message: "Your card was declined.".into(),
                code: Some("card_declined".into()),
                param: None,
            });
        }
        Ok(json!({
            "id": format!("sub_{}", uuid::Uuid::new_v4().simple()),
            "object": "subscription",
            "customer": params.customer.as_str(),
            "status": "incomplete",
            "items": {
                "object": "list",
                "data": [{ "id": "si_new", "plan": { "id": params.plan.as_str() } }]
            },
            "latest_invoice": {
                "id": "in_first",
                "payment_intent": { "id": "pi_first", "status": "requires_confirmation" }
            }
        }))
    }

    async fn retrieve_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError> {
        self.push(Call::RetrieveSubscription(id.to_string()));
        self.subscriptions
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found("subscription", id.as_str()))
    }

    async fn retrieve_customer(&self, id: &CustomerId) -> Result<Value, StripeError> {
        self.push(Call::RetrieveCustomer(id.to_string()));
        self.customers
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found("customer", id.as_str()))
    }

    async fn upcoming_invoice(&self, customer: &CustomerId) -> Result<Value, StripeError> {
        self.push(Call::UpcomingInvoice(customer.to_string()));
        if !self.customers.lock().unwrap().contains_key(customer.as_str()) {
            return Err(not_found("customer", customer.as_str()));
        }
        Ok(json!({
            "object": "invoice",
            "customer": customer.as_str(),
            "amount_due": 100,
            "next_payment_attempt": 1_700_086_400
        }))
    }

    async fn retrieve_invoice(&self, id: &InvoiceId) -> Result<Value, StripeError> {
        self.push(Call::RetrieveInvoice(id.to_string()));
        if id.as_str() == "in_missing" {
            return Err(not_found("invoice", id.as_str()));
        }
        Ok(json!({ "id": id.as_str(), "object": "invoice", "status": "paid" }))
    }

    async fn delete_subscription(&self, id: &SubscriptionId) -> Result<Value, StripeError> {
        self.push(Call::DeleteSubscription(id.to_string()));
        let mut subscription = self
            .subscriptions
            .lock()
            .unwrap()
            .remove(id.as_str())
            .ok_or_else(|| not_found("subscription", id.as_str()))?;
        subscription["status"] = json!("canceled");
        Ok(subscription)
    }

    async fn update_subscription(
        &self,
        id: &SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<Value, StripeError> {
        self.push(Call::UpdateSubscription(id.to_string(), update.clone()));
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .get_mut(id.as_str())
            .ok_or_else(|| not_found("subscription", id.as_str()))?;
        if let Some(flag) = update.cancel_at_period_end {
            subscription["cancel_at_period_end"] = json!(flag);
        }
        Ok(subscription.clone())
    }
}

/// Recorder that keeps every dispatched event type.
#[derive(Default)]
pub struct RecordingRecorder {
    events: Mutex<Vec<(WebhookEventType, Value)>>,
}

impl RecordingRecorder {
    pub fn events(&self) -> Vec<(WebhookEventType, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventRecorder for RecordingRecorder {
    fn record(&self, event_type: &WebhookEventType, object: &Value) {
        self.events
            .lock()
            .unwrap()
            .push((event_type.clone(), object.clone()));
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The fake provider behind the server.
    pub provider: Arc<FakeProvider>,
    /// Recorder receiving dispatched webhook events.
    pub recorder: Arc<RecordingRecorder>,
    /// Static directory (kept alive for test duration).
    pub _static_dir: TempDir,
}

impl TestHarness {
    /// Harness with a provider, a plan and no webhook secret.
    pub fn new() -> Self {
        Self::build(Some(Arc::new(FakeProvider::new())), |_| {})
    }

    /// Harness whose webhooks must be signed with [`WEBHOOK_SECRET`].
    pub fn with_webhook_secret() -> Self {
        Self::build(Some(Arc::new(FakeProvider::new())), |config| {
            config.stripe_webhook_secret = Some(WEBHOOK_SECRET.into());
        })
    }

    /// Harness around a specific provider.
    pub fn with_provider(provider: FakeProvider) -> Self {
        Self::build(Some(Arc::new(provider)), |_| {})
    }

    /// Harness with no provider configured at all.
    pub fn without_provider() -> Self {
        Self::build(None, |config| {
            config.stripe_secret_key = None;
        })
    }

    /// Build a harness, letting the caller adjust the config.
    pub fn build(provider: Option<Arc<FakeProvider>>, adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let static_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");
        std::fs::write(static_dir.path().join("script.js"), "console.log('paygate');")
            .expect("Failed to write script.js");

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            static_dir: static_dir.path().to_path_buf(),
            stripe_secret_key: Some("sk_test_paygate".into()),
            stripe_publishable_key: Some(PUBLISHABLE_KEY.into()),
            subscription_plan_id: Some(PLAN_ID.into()),
            stripe_webhook_secret: None,
            ..ServiceConfig::default()
        };
        adjust(&mut config);

        let provider = provider.unwrap_or_default();
        let recorder = Arc::new(RecordingRecorder::default());

        let dyn_provider: Option<Arc<dyn BillingProvider>> = config
            .stripe_secret_key
            .as_ref()
            .map(|_| Arc::clone(&provider) as Arc<dyn BillingProvider>);

        let state = AppState::with_provider(config, dyn_provider)
            .with_recorder(Arc::clone(&recorder) as Arc<dyn EventRecorder>);
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            server,
            provider,
            recorder,
            _static_dir: static_dir,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

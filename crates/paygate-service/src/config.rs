//! Service configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::stripe::webhook::DEFAULT_TOLERANCE_SECONDS;
use crate::stripe::StripeClient;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:4242").
    pub listen_addr: String,

    /// Directory holding `index.html` and the web client's assets.
    pub static_dir: PathBuf,

    /// Stripe secret API key (optional; provider routes answer 503 without it).
    pub stripe_secret_key: Option<String>,

    /// Stripe publishable key handed to the web client.
    pub stripe_publishable_key: Option<String>,

    /// Plan every new customer is subscribed to.
    pub subscription_plan_id: Option<String>,

    /// Stripe webhook signing secret (optional; verification is skipped without it).
    pub stripe_webhook_secret: Option<String>,

    /// Stripe API base URL.
    pub stripe_api_base: String,

    /// Maximum age of a webhook signature in seconds.
    pub webhook_tolerance_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    secret_key: String,
    #[serde(default)]
    publishable_key: Option<String>,
    #[serde(default)]
    webhook_secret: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Try to load Stripe secrets from file first, then fall back to env vars
        let (stripe_secret_key, stripe_publishable_key, stripe_webhook_secret) =
            load_stripe_secrets();

        Self {
            listen_addr: env_var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            static_dir: env_var("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            stripe_secret_key,
            stripe_publishable_key,
            subscription_plan_id: env_var("SUBSCRIPTION_PLAN_ID")
                .or_else(|| env_var("ONE_DAY_SUBSCRIPTION_PLAN_ID")),
            stripe_webhook_secret,
            stripe_api_base: env_var("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            webhook_tolerance_seconds: parsed_env_var("WEBHOOK_TOLERANCE_SECONDS")
                .unwrap_or(defaults.webhook_tolerance_seconds),
            cors_origins: env_var("CORS_ORIGINS").map_or(defaults.cors_origins, |origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            max_body_bytes: parsed_env_var("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: parsed_env_var("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Path of the page served at `/`.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|s| s.parse().ok())
}

/// Load Stripe secrets from file or environment.
fn load_stripe_secrets() -> (Option<String>, Option<String>, Option<String>) {
    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            return (
                Some(secrets.secret_key),
                secrets
                    .publishable_key
                    .or_else(|| env_var("STRIPE_PUBLISHABLE_KEY")),
                secrets
                    .webhook_secret
                    .filter(|s| !s.is_empty())
                    .or_else(|| env_var("STRIPE_WEBHOOK_SECRET")),
            );
        }
    }

    // Fall back to environment variables
    tracing::debug!("Stripe secrets file not found, using environment variables");
    (
        env_var("STRIPE_SECRET_KEY"),
        env_var("STRIPE_PUBLISHABLE_KEY"),
        env_var("STRIPE_WEBHOOK_SECRET"),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4242".into(),
            static_dir: PathBuf::from("./client"),
            stripe_secret_key: None,
            stripe_publishable_key: None,
            subscription_plan_id: None,
            stripe_webhook_secret: None,
            stripe_api_base: StripeClient::BASE_URL.into(),
            webhook_tolerance_seconds: DEFAULT_TOLERANCE_SECONDS,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

//! Paygate Service - HTTP relay between the web client and Stripe.
//!
//! This is the main entry point for the paygate service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paygate_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load a local .env before anything reads the environment
    let dotenv_path = dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,paygate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(dotenv = ?dotenv_path, "Starting Paygate Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        static_dir = %config.static_dir.display(),
        stripe_configured = %config.stripe_secret_key.is_some(),
        plan_configured = %config.subscription_plan_id.is_some(),
        webhook_verification = %config.stripe_webhook_secret.is_some(),
        "Service configuration loaded"
    );

    let state = AppState::new(config.clone());

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

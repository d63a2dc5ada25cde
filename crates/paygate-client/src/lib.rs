//! Paygate Client SDK.
//!
//! This crate provides a client library for talking to the paygate billing
//! gateway from Rust instead of the bundled web page.
//!
//! # Example
//!
//! ```no_run
//! use paygate_client::GatewayClient;
//! use paygate_core::PaymentMethodId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GatewayClient::new("http://localhost:4242")?;
//!
//! let payment_method = PaymentMethodId::new("pm_card_visa")?;
//! let subscription = client
//!     .create_customer(&payment_method, "jenny@example.com")
//!     .await?;
//!
//! println!("Subscription status: {}", subscription["status"]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, GatewayClient};
pub use error::ClientError;
pub use types::*;

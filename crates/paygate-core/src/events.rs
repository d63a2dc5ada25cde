//! Webhook event types.
//!
//! The provider pushes events as a JSON envelope carrying a type tag and a
//! data object whose shape depends on the tag. The gateway handles a closed
//! set of tags; anything else is `Unrecognized` and gets rejected.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Webhook event types the gateway dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    /// `customer.created`
    CustomerCreated,
    /// `customer.updated`
    CustomerUpdated,
    /// `invoice.upcoming`
    InvoiceUpcoming,
    /// `invoice.created`
    InvoiceCreated,
    /// `invoice.finalized`
    InvoiceFinalized,
    /// `invoice.payment_succeeded`
    InvoicePaymentSucceeded,
    /// `invoice.payment_failed`
    InvoicePaymentFailed,
    /// `customer.subscription.created`
    SubscriptionCreated,
    /// Any other tag, kept verbatim.
    Unrecognized(String),
}

impl WebhookEventType {
    /// Every recognized event type.
    pub const RECOGNIZED: [Self; 8] = [
        Self::CustomerCreated,
        Self::CustomerUpdated,
        Self::InvoiceUpcoming,
        Self::InvoiceCreated,
        Self::InvoiceFinalized,
        Self::InvoicePaymentSucceeded,
        Self::InvoicePaymentFailed,
        Self::SubscriptionCreated,
    ];

    /// Get the provider's tag for this event type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CustomerCreated => "customer.created",
            Self::CustomerUpdated => "customer.updated",
            Self::InvoiceUpcoming => "invoice.upcoming",
            Self::InvoiceCreated => "invoice.created",
            Self::InvoiceFinalized => "invoice.finalized",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Check if this is one of the handled event types.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl FromStr for WebhookEventType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "customer.created" => Self::CustomerCreated,
            "customer.updated" => Self::CustomerUpdated,
            "invoice.upcoming" => Self::InvoiceUpcoming,
            "invoice.created" => Self::InvoiceCreated,
            "invoice.finalized" => Self::InvoiceFinalized,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "customer.subscription.created" => Self::SubscriptionCreated,
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl From<&str> for WebhookEventType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(event_type) => event_type,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Event type tag as sent by the provider.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: Option<i64>,
    /// Event data.
    pub data: WebhookEventData,
}

impl WebhookEvent {
    /// Parse an envelope from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid envelope.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// The typed event type.
    #[must_use]
    pub fn kind(&self) -> WebhookEventType {
        WebhookEventType::from(self.event_type.as_str())
    }
}

/// Webhook event data container.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The object the event is about.
    pub object: serde_json::Value,
}

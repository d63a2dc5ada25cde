//! Stripe webhook signature verification.
//!
//! Stripe signs each delivery with the endpoint's signing secret and sends
//! `Stripe-Signature: t=<unix ts>,v1=<hex hmac>[,v1=<hex hmac>...]`. The
//! signed message is `"<t>." + raw body`, so verification must see the body
//! bytes exactly as received.

use paygate_core::WebhookEvent;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Default tolerance between the signed timestamp and now, in seconds.
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

/// Reasons a webhook delivery is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    /// The signature header was absent.
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("malformed signature header: {0}")]
    MalformedHeader(&'static str),

    /// No `v1` signature matched.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The signed timestamp is too old.
    #[error("timestamp outside tolerance ({age}s old)")]
    TimestampOutsideTolerance {
        /// Age of the signature in seconds.
        age: i64,
    },

    /// The verified body is not a valid event envelope.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Verifies webhook deliveries against a signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_seconds: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier with the default tolerance.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_tolerance(secret, DEFAULT_TOLERANCE_SECONDS)
    }

    /// Create a verifier with a custom tolerance in seconds.
    #[must_use]
    pub fn with_tolerance(secret: impl Into<String>, tolerance_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds: i64::try_from(tolerance_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Verify a delivery against the current time and parse the event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        header: Option<&str>,
    ) -> Result<WebhookEvent, WebhookError> {
        let header = header.ok_or(WebhookError::MissingSignature)?;
        self.verify_at(payload, header, chrono::Utc::now().timestamp())?;
        WebhookEvent::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    /// Verify a signature header as of `now` (Unix seconds).
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<(), WebhookError> {
        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in header.split(',') {
            let mut kv = part.trim().splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(ts)) => timestamp = Some(ts),
                (Some("v1"), Some(sig)) => signatures.push(sig),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(WebhookError::MalformedHeader("missing timestamp"))?;
        let signed_at: i64 = timestamp
            .parse()
            .map_err(|_| WebhookError::MalformedHeader("timestamp is not an integer"))?;

        if signatures.is_empty() {
            return Err(WebhookError::MalformedHeader("no v1 signature"));
        }

        let expected = hmac_sha256_hex(&self.secret, &[timestamp.as_bytes(), b".", payload]);

        if !signatures.iter().any(|sig| constant_time_eq(&expected, sig)) {
            return Err(WebhookError::SignatureMismatch);
        }

        let age = now - signed_at;
        if self.tolerance_seconds > 0 && age > self.tolerance_seconds {
            return Err(WebhookError::TimestampOutsideTolerance { age });
        }

        Ok(())
    }

    /// Produce a valid signature header for `payload` signed at `timestamp`.
    ///
    /// Used to sign test deliveries and by local tooling that replays events.
    #[must_use]
    pub fn signature_header(&self, payload: &[u8], timestamp: i64) -> String {
        let ts = timestamp.to_string();
        let sig = hmac_sha256_hex(&self.secret, &[ts.as_bytes(), b".", payload]);
        format!("t={ts},v1={sig}")
    }
}

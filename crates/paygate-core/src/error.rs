//! Error types for paygate.

/// Result type for paygate operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur in gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required request field was absent or empty.
    #[error("missing field: {field}")]
    MissingField {
        /// The field name as sent by the client.
        field: &'static str,
    },

    /// A provider object did not have the expected shape.
    #[error("unexpected provider object: {0}")]
    UnexpectedShape(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

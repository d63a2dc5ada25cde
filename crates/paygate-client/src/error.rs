//! Client error types.

/// Errors that can occur when using the paygate client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway rejected the request.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The billing provider failed and the gateway relayed its error object.
    #[error("provider error: {error_type} - {message}")]
    Provider {
        /// Provider error type (e.g. `card_error`).
        error_type: String,
        /// Provider message.
        message: String,
        /// Provider error code, if any.
        code: Option<String>,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

//! Gateway error types.

use paygate_core::{CustomerId, IdError, SourceId};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Invalid or missing configuration (e.g. empty API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// HTTP request failed (connection, timeout, or body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("Stripe API error ({status}): {error_type} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type (e.g. `invalid_request_error`, `card_error`).
        error_type: String,
        /// Human readable message.
        message: String,
        /// Error code (e.g. `resource_missing`).
        code: Option<String>,
        /// Parameter that caused the error.
        param: Option<String>,
    },

    /// The customer exists but has been deleted.
    #[error("customer deleted: {customer_id}")]
    CustomerDeleted {
        /// The deleted customer.
        customer_id: CustomerId,
    },

    /// The source exists but is not a card.
    #[error("source is not a card: {source_id}")]
    NotACard {
        /// The offending source.
        source_id: SourceId,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}

impl GatewayError {
    /// Whether the failure came from the provider side (network or API),
    /// as opposed to local configuration or input.
    #[must_use]
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Api { .. } | Self::CustomerDeleted { .. } | Self::NotACard { .. }
        )
    }

    /// HTTP status associated with the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Provider error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            Self::CustomerDeleted { .. } => Some("customer_deleted"),
            _ => None,
        }
    }

    /// Whether the provider reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CustomerDeleted { .. })
            || self.status() == Some(404)
            || self.code() == Some("resource_missing")
    }
}

//! Client error types

use shared::error::FieldErrors;
use thiserror::Error;

/// Record-store client error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure (DNS, refused connection, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Target record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store-side validation failure with a field-error map
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Internal { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store client operations
pub type StoreResult<T> = Result<T, StoreError>;

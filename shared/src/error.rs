//! Error taxonomy for catalog operations
//!
//! Five classes cover every failure the console surfaces:
//! - [`CatalogError::Validation`]: local, pre-network, field-level
//! - [`CatalogError::RemoteValidation`]: field map echoed by the record store
//! - [`CatalogError::NotFound`]: target vanished, caller should refresh
//! - [`CatalogError::Connectivity`]: network/transport failure
//! - [`CatalogError::Unknown`]: fallback for anything else
//!
//! Validation errors never reach the network; remote errors keep all context
//! (status text, field map) up to the rendering boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to human-readable message, as echoed by the record store.
pub type FieldErrors = BTreeMap<String, String>;

/// Catalog operation error
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CatalogError {
    /// Local validation failure; blocks the action with field-level feedback
    /// and never produces network traffic.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Store-side validation failure with a per-field error map.
    #[error("validation failed: {}", format_field_errors(.0))]
    RemoteValidation(FieldErrors),

    /// The target record no longer exists.
    #[error("record not found")]
    NotFound,

    /// Network or transport failure.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Fallback for unclassified failures.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl CatalogError {
    /// Create a local validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error was produced locally, before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = CatalogError::validation("price", "Price must be a positive number");
        assert_eq!(err.to_string(), "price: Price must be a positive number");
        assert!(err.is_local());
    }

    #[test]
    fn remote_validation_display_joins_fields() {
        let mut map = FieldErrors::new();
        map.insert("name".into(), "required".into());
        map.insert("price".into(), "out of range".into());
        let err = CatalogError::RemoteValidation(map);
        assert_eq!(
            err.to_string(),
            "validation failed: name: required, price: out of range"
        );
        assert!(!err.is_local());
    }
}

//! Shared types for the Urchin catalog console
//!
//! Domain models, the error taxonomy, and query/predicate types used by both
//! the record-store client and the console engine.

pub mod collections;
pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use error::{CatalogError, CatalogResult, FieldErrors};
pub use query::{Constraint, ListQuery, ListResult, Predicate};

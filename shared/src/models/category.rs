//! Category and Subcategory Models

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Subcategory entity
///
/// A subcategory always belongs to exactly one category; product validation
/// rejects a subcategory whose `category` does not match the product's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    /// Category reference (String ID, required)
    pub category: String,
}

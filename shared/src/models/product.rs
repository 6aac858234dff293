//! Product Model

use serde::{Deserialize, Serialize};

/// Product lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// External product identifier (required, non-empty)
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Always >= 0
    pub price: f64,
    #[serde(default)]
    pub status: ProductStatus,
    /// Brand reference (String ID, required)
    pub brand: String,
    /// Category reference (String ID, required)
    pub category: String,
    /// Subcategory reference; must belong to `category` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Ordered photo references. Order is the only meaningful property;
    /// entries are opaque. Always serialized so an empty list reads as
    /// "clear" rather than "no change".
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Create/update input payload
///
/// `price` stays a raw string until validation parses it, so a form can hold
/// whatever the user typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub status: ProductStatus,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl ProductDraft {
    /// Full-record draft seeded from an existing product, used when an update
    /// must submit every required field rather than a partial diff.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            status: product.status,
            brand: product.brand.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            photos: product.photos.clone(),
        }
    }
}

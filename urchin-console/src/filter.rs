//! Filter state and predicate translation

use shared::models::Product;
use shared::query::{Constraint, Predicate};

/// One immutable filter selection; a new value is built per query.
///
/// Empty selections mean "no constraint", never empty-string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            brand: None,
            category: None,
            subcategory: None,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Search tokens: trimmed, lowercased, whitespace-split. Blank search
    /// yields none.
    pub fn search_tokens(&self) -> Vec<String> {
        self.search
            .trim()
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_tokens().is_empty()
            || selection(&self.brand).is_some()
            || selection(&self.category).is_some()
            || selection(&self.subcategory).is_some()
    }
}

fn selection(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Map a filter selection into a store-agnostic constraint set.
pub fn translate(state: &FilterState) -> Predicate {
    let mut predicate = Predicate::new();

    let tokens = state.search_tokens();
    if !tokens.is_empty() {
        predicate.push(Constraint::Search(tokens));
    }

    for (field, value) in [
        ("brand", &state.brand),
        ("category", &state.category),
        ("subcategory", &state.subcategory),
    ] {
        if let Some(value) = selection(value) {
            predicate.push(Constraint::eq(field, value));
        }
    }

    predicate
}

/// Field accessor for matching a product against a predicate.
pub fn product_field(product: &Product, field: &str) -> Option<String> {
    match field {
        "name" => Some(product.name.clone()),
        "productId" => Some(product.product_id.clone()),
        "description" => product.description.clone(),
        "brand" => Some(product.brand.clone()),
        "category" => Some(product.category.clone()),
        "subcategory" => product.subcategory.clone(),
        _ => None,
    }
}

//! Record-store collection names

pub const PRODUCTS: &str = "products";
pub const BRANDS: &str = "brands";
pub const CATEGORIES: &str = "categories";
pub const SUBCATEGORIES: &str = "subcategories";

//! Domain models

mod brand;
mod category;
mod product;

pub use brand::Brand;
pub use category::{Category, Subcategory};
pub use product::{Product, ProductDraft, ProductStatus};

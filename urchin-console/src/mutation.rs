//! Create/update/delete execution against the record store
//!
//! Every mutation validates locally before touching the network, submits the
//! complete record (never a partial diff), and classifies remote failures
//! into the [`CatalogError`] taxonomy. A failed mutation leaves no partial
//! state behind; callers reconcile their optimistic transitions with the
//! returned result.

use std::sync::Arc;

use serde_json::{Value, json};
use shared::models::{Product, ProductDraft, ProductStatus, Subcategory};
use shared::{CatalogError, CatalogResult, collections};
use urchin_client::{RecordStore, StoreError};

/// A draft that passed local validation, fields normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub status: ProductStatus,
    pub brand: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub photos: Vec<String>,
}

impl ValidDraft {
    /// Overlay this draft onto an existing record, producing the tentative
    /// state an optimistic replace shows until the store confirms.
    pub fn apply_to(&self, product: &mut Product) {
        product.product_id = self.product_id.clone();
        product.name = self.name.clone();
        product.description = if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        };
        product.price = self.price;
        product.status = self.status;
        product.brand = self.brand.clone();
        product.category = self.category.clone();
        product.subcategory = self.subcategory.clone();
        product.photos = self.photos.clone();
    }
}

/// Validate a draft before any remote call.
///
/// Checks mirror the store's required-field rules so failures stay local:
/// productId and name non-empty after trim, brand and category selected,
/// price a finite number >= 0, and the subcategory (when set) belonging to
/// the selected category.
pub fn validate_draft(
    draft: &ProductDraft,
    subcategories: &[Subcategory],
) -> CatalogResult<ValidDraft> {
    let product_id = draft.product_id.trim();
    if product_id.is_empty() {
        return Err(CatalogError::validation(
            "productId",
            "Product ID is required",
        ));
    }

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CatalogError::validation("name", "Product name is required"));
    }

    if draft.brand.is_empty() {
        return Err(CatalogError::validation("brand", "Brand is required"));
    }

    if draft.category.is_empty() {
        return Err(CatalogError::validation("category", "Category is required"));
    }

    let price = parse_price(&draft.price)?;

    let subcategory = draft
        .subcategory
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(sub_id) = &subcategory {
        let belongs = subcategories
            .iter()
            .any(|sub| &sub.id == sub_id && sub.category == draft.category);
        if !belongs {
            return Err(CatalogError::validation(
                "subcategory",
                "Subcategory does not belong to the selected category",
            ));
        }
    }

    Ok(ValidDraft {
        product_id: product_id.to_string(),
        name: name.to_string(),
        description: draft.description.trim().to_string(),
        price,
        status: draft.status,
        brand: draft.brand.clone(),
        category: draft.category.clone(),
        subcategory,
        photos: draft.photos.clone(),
    })
}

/// Parse a price input into a finite number >= 0.
pub fn parse_price(input: &str) -> CatalogResult<f64> {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(CatalogError::validation(
            "price",
            "Price must be a positive number",
        )),
    }
}

/// Classify a store failure into the catalog taxonomy.
pub fn classify(err: StoreError) -> CatalogError {
    match err {
        StoreError::Http(e) => CatalogError::Connectivity(e.to_string()),
        StoreError::NotFound(_) => CatalogError::NotFound,
        StoreError::Validation(fields) => CatalogError::RemoteValidation(fields),
        StoreError::Unauthorized => CatalogError::Unknown("authentication required".to_string()),
        StoreError::InvalidResponse(msg) => CatalogError::Unknown(msg),
        StoreError::Internal { status, message } => {
            CatalogError::Unknown(format!("status {status}: {message}"))
        }
        StoreError::Serialization(e) => CatalogError::Unknown(e.to_string()),
    }
}

fn decode_product(value: Value) -> CatalogResult<Product> {
    serde_json::from_value(value).map_err(|e| CatalogError::Unknown(format!("malformed record: {e}")))
}

/// Wire payload for a validated draft.
///
/// Always the complete record: the store's validation expects every required
/// field, and `photos` is the full desired order — an explicit empty list
/// when cleared, never an omitted field.
fn payload(valid: &ValidDraft) -> Value {
    json!({
        "productId": valid.product_id,
        "name": valid.name,
        "description": valid.description,
        "price": valid.price,
        "status": valid.status,
        "brand": valid.brand,
        "category": valid.category,
        // Empty string clears the relation on the store side.
        "subcategory": valid.subcategory.clone().unwrap_or_default(),
        "photos": valid.photos,
    })
}

/// Executes catalog mutations against the record store.
#[derive(Clone)]
pub struct MutationCoordinator {
    store: Arc<dyn RecordStore>,
}

impl MutationCoordinator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validate and create. Validation failures return before any network
    /// interaction.
    pub async fn create(
        &self,
        draft: &ProductDraft,
        subcategories: &[Subcategory],
    ) -> CatalogResult<Product> {
        let valid = validate_draft(draft, subcategories)?;
        self.create_valid(&valid).await
    }

    /// Create from an already-validated draft.
    pub async fn create_valid(&self, valid: &ValidDraft) -> CatalogResult<Product> {
        tracing::debug!(product_id = %valid.product_id, "creating product");
        let record = self
            .store
            .create(collections::PRODUCTS, payload(valid))
            .await
            .map_err(classify)?;
        decode_product(record)
    }

    /// Validate and update with the complete record.
    pub async fn update(
        &self,
        id: &str,
        draft: &ProductDraft,
        subcategories: &[Subcategory],
    ) -> CatalogResult<Product> {
        let valid = validate_draft(draft, subcategories)?;
        self.update_valid(id, &valid).await
    }

    /// Update from an already-validated draft.
    pub async fn update_valid(&self, id: &str, valid: &ValidDraft) -> CatalogResult<Product> {
        tracing::debug!(id, "updating product");
        let record = self
            .store
            .update(collections::PRODUCTS, id, payload(valid))
            .await
            .map_err(classify)?;
        decode_product(record)
    }

    /// Delete a record.
    pub async fn remove(&self, id: &str) -> CatalogResult<()> {
        tracing::debug!(id, "deleting product");
        self.store
            .delete(collections::PRODUCTS, id)
            .await
            .map_err(classify)
    }
}

/// Two-phase delete confirmation, one armed row at a time.
///
/// The first request on a row arms it; a second request while armed fires.
/// Arming a different row, or any other interaction routed through
/// [`DeleteArm::disarm`], drops the previous arm.
#[derive(Debug, Default)]
pub struct DeleteArm {
    armed: Option<String>,
}

impl DeleteArm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the delete should execute (second consecutive
    /// request on the same row).
    pub fn request(&mut self, id: &str) -> bool {
        if self.armed.as_deref() == Some(id) {
            self.armed = None;
            true
        } else {
            self.armed = Some(id.to_string());
            false
        }
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.armed.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            product_id: "SKU-1".into(),
            name: "Widget".into(),
            description: " heavy duty ".into(),
            price: "9.50".into(),
            status: ProductStatus::Active,
            brand: "b1".into(),
            category: "c1".into(),
            subcategory: None,
            photos: vec!["a.jpg".into()],
        }
    }

    fn subcategories() -> Vec<Subcategory> {
        vec![
            Subcategory {
                id: "s1".into(),
                name: "Inner".into(),
                category: "c1".into(),
            },
            Subcategory {
                id: "s2".into(),
                name: "Other".into(),
                category: "c9".into(),
            },
        ]
    }

    #[test]
    fn valid_draft_normalizes_fields() {
        let valid = validate_draft(&draft(), &[]).unwrap();
        assert_eq!(valid.price, 9.5);
        assert_eq!(valid.description, "heavy duty");
    }

    #[test]
    fn rejects_blank_required_fields() {
        for (mutate, field) in [
            (
                Box::new(|d: &mut ProductDraft| d.product_id = "  ".into())
                    as Box<dyn Fn(&mut ProductDraft)>,
                "productId",
            ),
            (Box::new(|d: &mut ProductDraft| d.name = "   ".into()), "name"),
            (Box::new(|d: &mut ProductDraft| d.brand = String::new()), "brand"),
            (
                Box::new(|d: &mut ProductDraft| d.category = String::new()),
                "category",
            ),
        ] {
            let mut d = draft();
            mutate(&mut d);
            match validate_draft(&d, &[]) {
                Err(CatalogError::Validation { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected validation error on {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_bad_prices() {
        for bad in ["", "abc", "-1", "NaN", "inf"] {
            let mut d = draft();
            d.price = bad.into();
            assert!(
                matches!(
                    validate_draft(&d, &[]),
                    Err(CatalogError::Validation { ref field, .. }) if field == "price"
                ),
                "price {bad:?}"
            );
        }
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert_eq!(parse_price(" 150 ").unwrap(), 150.0);
    }

    #[test]
    fn subcategory_must_belong_to_category() {
        let mut d = draft();
        d.subcategory = Some("s1".into());
        assert!(validate_draft(&d, &subcategories()).is_ok());

        d.subcategory = Some("s2".into()); // belongs to c9, not c1
        assert!(matches!(
            validate_draft(&d, &subcategories()),
            Err(CatalogError::Validation { ref field, .. }) if field == "subcategory"
        ));

        // Empty selection means "none", not empty-string equality.
        d.subcategory = Some(String::new());
        assert_eq!(validate_draft(&d, &subcategories()).unwrap().subcategory, None);
    }

    #[test]
    fn payload_always_carries_full_photo_order() {
        let mut valid = validate_draft(&draft(), &[]).unwrap();
        valid.photos = vec!["c.jpg".into(), "a.jpg".into()];
        let value = payload(&valid);
        assert_eq!(value["photos"], json!(["c.jpg", "a.jpg"]));

        valid.photos.clear();
        let value = payload(&valid);
        // Explicit empty list, never an omitted field.
        assert_eq!(value["photos"], json!([]));
        assert_eq!(value["status"], json!("active"));
    }

    #[test]
    fn classify_maps_store_errors() {
        assert_eq!(
            classify(StoreError::NotFound("gone".into())),
            CatalogError::NotFound
        );
        let mut fields = shared::FieldErrors::new();
        fields.insert("name".into(), "required".into());
        assert_eq!(
            classify(StoreError::Validation(fields.clone())),
            CatalogError::RemoteValidation(fields)
        );
        assert!(matches!(
            classify(StoreError::Internal {
                status: 500,
                message: "boom".into()
            }),
            CatalogError::Unknown(_)
        ));
    }

    #[test]
    fn delete_arm_requires_two_consecutive_requests() {
        let mut arm = DeleteArm::new();
        assert!(!arm.request("a"));
        assert!(arm.is_armed("a"));
        assert!(arm.request("a"));
        assert!(arm.armed().is_none());

        // A confirmation on a different row disarms the first and arms the
        // second instead of firing.
        assert!(!arm.request("a"));
        assert!(!arm.request("b"));
        assert!(arm.is_armed("b"));
        assert!(!arm.is_armed("a"));

        arm.disarm();
        assert!(!arm.request("b"));
    }
}

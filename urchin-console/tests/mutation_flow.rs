//! Inline edit and form submission flows against a mock store

mod common;

use std::sync::Arc;

use common::{MockStore, init_tracing, product_record};
use serde_json::json;
use shared::{CatalogError, FieldErrors};
use urchin_client::StoreError;
use urchin_console::{
    CatalogConsole, EditField, FilterState, InlineTrigger,
};

fn console_with(store: Arc<MockStore>) -> CatalogConsole {
    init_tracing();
    CatalogConsole::new(store)
}

fn seeded_store() -> Arc<MockStore> {
    let store = MockStore::new();
    store.seed(
        "products",
        vec![
            product_record("a", "Blue Widget", 10.0),
            product_record("b", "Red Widget", 20.0),
        ],
    );
    Arc::new(store)
}

fn update_calls(store: &MockStore) -> usize {
    store
        .calls()
        .iter()
        .filter(|c| c.starts_with("update:"))
        .count()
}

// ==================== Inline editing ====================

#[tokio::test]
async fn inline_price_edit_commits_after_confirmation() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    assert!(console.start_inline("a", EditField::Price));
    // The displayed value is untouched while the user types.
    console.inline_input("150");
    assert_eq!(console.catalog().get("a").unwrap().product.price, 10.0);

    console.inline_trigger(InlineTrigger::Enter).await?;
    assert_eq!(console.catalog().get("a").unwrap().product.price, 150.0);
    assert!(console.inline().is_none());
    assert_eq!(update_calls(&store), 1);

    // The full record went over the wire, not just the edited field.
    let record = store.record("products", "a").ok_or_else(|| anyhow::anyhow!("record gone"))?;
    assert_eq!(record["name"], "Blue Widget");
    assert_eq!(record["price"], 150.0);
    Ok(())
}

#[tokio::test]
async fn failed_inline_edit_keeps_the_displayed_value() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    console.start_inline("a", EditField::Price);
    console.inline_input("150");
    store.inject_failure(StoreError::Internal {
        status: 500,
        message: "boom".into(),
    });
    let err = console.inline_trigger(InlineTrigger::Enter).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unknown(_)));

    // Never optimistic: the row still shows the last confirmed value.
    assert_eq!(console.catalog().get("a").unwrap().product.price, 10.0);
    assert!(console.inline().is_none());
    Ok(())
}

#[tokio::test]
async fn invalid_inline_input_aborts_without_a_store_call() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    console.start_inline("a", EditField::Name);
    console.inline_input("   ");
    let err = console.inline_trigger(InlineTrigger::Enter).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation { ref field, .. } if field == "name"));

    assert_eq!(update_calls(&store), 0);
    assert_eq!(console.catalog().get("a").unwrap().product.name, "Blue Widget");
    assert!(console.inline().is_none());
    Ok(())
}

#[tokio::test]
async fn escape_wins_over_the_deferred_blur_commit() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    console.start_inline("a", EditField::Name);
    console.inline_input("Gadget");
    console.inline_blur();
    console.inline_trigger(InlineTrigger::Escape).await?;
    // The grace period elapses after the session is already gone.
    console.inline_trigger(InlineTrigger::ResolveBlur).await?;

    assert_eq!(update_calls(&store), 0);
    assert_eq!(console.catalog().get("a").unwrap().product.name, "Blue Widget");
    Ok(())
}

#[tokio::test]
async fn deferred_blur_commits_when_nothing_preempts_it() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    console.start_inline("a", EditField::Name);
    console.inline_input("Gadget");
    console.inline_blur();
    console.inline_trigger(InlineTrigger::ResolveBlur).await?;

    assert_eq!(update_calls(&store), 1);
    assert_eq!(console.catalog().get("a").unwrap().product.name, "Gadget");
    Ok(())
}

#[tokio::test]
async fn remote_validation_on_inline_edit_reverts_the_field() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    console.start_inline("a", EditField::Name);
    console.inline_input("Duplicate");
    let mut fields = FieldErrors::new();
    fields.insert("name".into(), "already exists".into());
    store.inject_failure(StoreError::Validation(fields.clone()));

    let err = console.inline_trigger(InlineTrigger::Enter).await.unwrap_err();
    assert_eq!(err, CatalogError::RemoteValidation(fields));
    assert_eq!(console.catalog().get("a").unwrap().product.name, "Blue Widget");
    Ok(())
}

// ==================== Form submission ====================

#[tokio::test]
async fn create_form_submits_and_prepends_the_new_row() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console.open_create_form();
    form.draft.product_id = "SKU-NEW".into();
    form.draft.name = "Green Gadget".into();
    form.draft.price = "30".into();
    form.draft.brand = "b1".into();
    form.draft.category = "c1".into();

    let created = console.submit_form(&mut form).await?.ok_or_else(|| {
        anyhow::anyhow!("submit was refused")
    })?;
    assert_eq!(created.name, "Green Gadget");
    assert_eq!(console.catalog().rows()[0].product.id, created.id);
    assert_eq!(console.catalog().total_items(), 3);
    assert!(!form.is_submitting());

    // The stored record carries an explicit empty photo list.
    let record = store
        .record("products", &created.id)
        .ok_or_else(|| anyhow::anyhow!("record gone"))?;
    assert_eq!(record["photos"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_form_rejects_invalid_drafts_locally() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console.open_create_form();
    form.draft.product_id = "SKU-NEW".into();
    form.draft.name = String::new();

    let err = console.submit_form(&mut form).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation { ref field, .. } if field == "name"));
    assert!(!store.calls().iter().any(|c| c.starts_with("create:")));
    // The lock is released, so a corrected draft can be resubmitted.
    assert!(!form.is_submitting());
    Ok(())
}

#[tokio::test]
async fn submit_is_refused_while_one_is_in_flight() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store);
    console.apply_filters(FilterState::new()).await?;

    let mut form = console.open_create_form();
    assert!(form.begin_submit());
    assert_eq!(console.submit_form(&mut form).await?, None);

    form.end_submit();
    form.close();
    assert_eq!(console.submit_form(&mut form).await?, None);
    Ok(())
}

#[tokio::test]
async fn edit_form_applies_optimistically_and_confirms() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console
        .open_edit_form("a")
        .ok_or_else(|| anyhow::anyhow!("row missing"))?;
    form.draft.name = "Blue Widget Mk2".into();

    let updated = console.submit_form(&mut form).await?.ok_or_else(|| {
        anyhow::anyhow!("submit was refused")
    })?;
    assert_eq!(updated.name, "Blue Widget Mk2");

    let row = console.catalog().get("a").ok_or_else(|| anyhow::anyhow!("row missing"))?;
    assert_eq!(row.product.name, "Blue Widget Mk2");
    assert!(!row.speculative);
    Ok(())
}

#[tokio::test]
async fn remote_validation_on_edit_rolls_the_row_back() -> anyhow::Result<()> {
    let store = seeded_store();
    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console
        .open_edit_form("a")
        .ok_or_else(|| anyhow::anyhow!("row missing"))?;
    form.draft.name = "Taken Name".into();

    let mut fields = FieldErrors::new();
    fields.insert("name".into(), "already exists".into());
    store.inject_failure(StoreError::Validation(fields.clone()));

    let err = console.submit_form(&mut form).await.unwrap_err();
    assert_eq!(err, CatalogError::RemoteValidation(fields));

    let row = console.catalog().get("a").ok_or_else(|| anyhow::anyhow!("row missing"))?;
    assert_eq!(row.product.name, "Blue Widget");
    assert!(!row.speculative);
    assert!(!form.is_submitting());
    Ok(())
}

#[tokio::test]
async fn removing_every_photo_sends_an_explicit_empty_list() -> anyhow::Result<()> {
    let store = MockStore::new();
    let mut record = product_record("a", "Blue Widget", 10.0);
    record["photos"] = json!(["x.jpg", "y.jpg"]);
    store.seed("products", vec![record]);
    let store = Arc::new(store);

    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console
        .open_edit_form("a")
        .ok_or_else(|| anyhow::anyhow!("row missing"))?;
    assert_eq!(form.photos.existing(), ["x.jpg", "y.jpg"]);
    form.photos.remove_existing(0);
    form.photos.remove_existing(0);

    console.submit_form(&mut form).await?;
    let stored = store
        .record("products", "a")
        .ok_or_else(|| anyhow::anyhow!("record gone"))?;
    assert_eq!(stored["photos"], json!([]));
    Ok(())
}

#[tokio::test]
async fn reordered_photos_reach_the_store_in_the_new_order() -> anyhow::Result<()> {
    let store = MockStore::new();
    let mut record = product_record("a", "Blue Widget", 10.0);
    record["photos"] = json!(["x.jpg", "y.jpg", "z.jpg"]);
    store.seed("products", vec![record]);
    let store = Arc::new(store);

    let mut console = console_with(store.clone());
    console.apply_filters(FilterState::new()).await?;

    let mut form = console
        .open_edit_form("a")
        .ok_or_else(|| anyhow::anyhow!("row missing"))?;
    form.photos.move_existing(2, 0);

    console.submit_form(&mut form).await?;
    let stored = store
        .record("products", "a")
        .ok_or_else(|| anyhow::anyhow!("record gone"))?;
    assert_eq!(stored["photos"], json!(["z.jpg", "x.jpg", "y.jpg"]));
    Ok(())
}

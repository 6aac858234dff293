//! Console facade
//!
//! Wires filters, pagination, the page cache, and mutations into one
//! single-threaded, event-driven surface. Every await is generation-checked
//! before its result is applied, so a response that lands after its
//! originating view is gone becomes a logged no-op instead of writing
//! unrelated state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{Brand, Category, Product, Subcategory};
use shared::query::ListQuery;
use shared::{CatalogError, CatalogResult, collections};
use urchin_client::RecordStore;

use crate::catalog::CatalogStore;
use crate::filter::{FilterState, translate};
use crate::form::{FormTarget, ProductFormSession};
use crate::inline::{EditField, Finalize, InlineEditSession, draft_with_edit};
use crate::mutation::{DeleteArm, MutationCoordinator, classify, validate_draft};
use crate::pagination::{PAGE_SIZE, Paginator};
use crate::view_mode::{PreferenceStore, ViewMode, load_view_mode, store_view_mode};

/// What a delete request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// First confirmation: the row is armed, nothing was sent.
    Armed,
    /// Second confirmation: the row was removed and the store confirmed.
    Deleted,
    /// The request was dropped (delete already in flight, or the view went
    /// away before the response).
    Ignored,
}

/// Finalize triggers the host can route into the active inline session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTrigger {
    Enter,
    Escape,
    /// The blur grace period elapsed.
    ResolveBlur,
}

/// The catalog console engine.
pub struct CatalogConsole {
    store: Arc<dyn RecordStore>,
    coordinator: MutationCoordinator,
    catalog: CatalogStore,
    filter: FilterState,
    paginator: Paginator,
    delete_arm: DeleteArm,
    inline: Option<InlineEditSession>,
    brands: Vec<Brand>,
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    view_mode: ViewMode,
    prefs: Option<Box<dyn PreferenceStore>>,
    loading: bool,
    deleting: bool,
}

impl CatalogConsole {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            coordinator: MutationCoordinator::new(store.clone()),
            store,
            catalog: CatalogStore::new(),
            filter: FilterState::new(),
            paginator: Paginator::new(),
            delete_arm: DeleteArm::new(),
            inline: None,
            brands: Vec::new(),
            categories: Vec::new(),
            subcategories: Vec::new(),
            view_mode: ViewMode::default(),
            prefs: None,
            loading: false,
            deleting: false,
        }
    }

    /// Attach a preference store and read the persisted view mode.
    pub fn with_preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.view_mode = load_view_mode(prefs.as_ref());
        self.prefs = Some(prefs);
        self
    }

    // ==================== Accessors ====================

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Whether any search text or selection narrows the listing; drives the
    /// "clear filters" affordance.
    pub fn has_active_filters(&self) -> bool {
        self.filter.has_active_filters()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn inline(&self) -> Option<&InlineEditSession> {
        self.inline.as_ref()
    }

    pub fn is_delete_armed(&self, id: &str) -> bool {
        self.delete_arm.is_armed(id)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Toggle grid/list and persist the choice when a preference store is
    /// attached.
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggle();
        if let Some(prefs) = self.prefs.as_mut() {
            store_view_mode(prefs.as_mut(), self.view_mode);
        }
        self.view_mode
    }

    // ==================== Listing ====================

    /// Load the brand/category/subcategory lookup tables.
    pub async fn load_lookups(&mut self) -> CatalogResult<()> {
        let brands = self
            .store
            .full_list(collections::BRANDS, "name")
            .await
            .map_err(classify)?;
        self.brands = decode_vec(brands)?;

        let categories = self
            .store
            .full_list(collections::CATEGORIES, "name")
            .await
            .map_err(classify)?;
        self.categories = decode_vec(categories)?;

        let subcategories = self
            .store
            .full_list(collections::SUBCATEGORIES, "name")
            .await
            .map_err(classify)?;
        self.subcategories = decode_vec(subcategories)?;
        Ok(())
    }

    /// Apply a new filter selection: page resets to 1, any active inline
    /// edit is cancelled, and the listing reloads.
    pub async fn apply_filters(&mut self, filter: FilterState) -> CatalogResult<()> {
        self.clear_inline();
        self.delete_arm.disarm();
        self.filter = filter;
        self.paginator.reset();
        self.reload().await
    }

    /// Navigate pages. The requested page clamps into range; the active
    /// inline edit is cancelled so a row about to scroll away cannot keep an
    /// open editor.
    pub async fn go_to_page(&mut self, page: u32) -> CatalogResult<()> {
        self.clear_inline();
        self.delete_arm.disarm();
        self.paginator.go_to(page);
        self.reload().await
    }

    /// Reload the current page with the current filter.
    pub async fn refresh(&mut self) -> CatalogResult<()> {
        self.reload().await
    }

    async fn reload(&mut self) -> CatalogResult<()> {
        if self.loading {
            return Ok(());
        }
        self.loading = true;
        let token = self.catalog.begin_load();
        let query = ListQuery::new(translate(&self.filter))
            .order_by("-created")
            .expand("brand,category");
        tracing::debug!(page = self.paginator.page(), "loading catalog page");

        let result = self
            .store
            .list(collections::PRODUCTS, self.paginator.page(), PAGE_SIZE, &query)
            .await;
        self.loading = false;

        let page = result.map_err(classify)?;
        if !self.catalog.is_live(token) {
            tracing::warn!(token, "discarding page for a superseded load");
            return Ok(());
        }
        let typed = page.try_map(serde_json::from_value::<Product>).map_err(|e| {
            CatalogError::Unknown(format!("malformed record: {e}"))
        })?;
        self.paginator.set_total_items(typed.total_items);
        self.catalog.set_page(token, typed.items, typed.total_items);
        Ok(())
    }

    // ==================== Inline editing ====================

    /// Begin editing a field in place. Replaces any previous session and
    /// disarms a pending delete (it is "another interaction").
    pub fn start_inline(&mut self, id: &str, field: EditField) -> bool {
        self.delete_arm.disarm();
        match self.catalog.get(id) {
            Some(row) => {
                self.inline = Some(InlineEditSession::start(&row.product, field));
                true
            }
            None => false,
        }
    }

    /// Route a keystroke into the active session.
    pub fn inline_input(&mut self, value: impl Into<String>) {
        if let Some(session) = self.inline.as_mut() {
            session.input(value);
        }
    }

    /// The edited cell lost focus; the commit is deferred until the host
    /// fires [`InlineTrigger::ResolveBlur`] after its grace period.
    pub fn inline_blur(&mut self) {
        if let Some(session) = self.inline.as_mut() {
            session.blur();
        }
    }

    /// Drive a finalize trigger through the active session. At most one
    /// trigger per session has any effect.
    pub async fn inline_trigger(&mut self, trigger: InlineTrigger) -> CatalogResult<()> {
        let Some(session) = self.inline.as_mut() else {
            return Ok(());
        };
        let outcome = match trigger {
            InlineTrigger::Enter => session.key_enter(),
            InlineTrigger::Escape => session.key_escape(),
            InlineTrigger::ResolveBlur => session.resolve_blur(),
        };
        match outcome {
            None => Ok(()),
            Some(Finalize::Cancelled(err)) => {
                self.inline = None;
                match err {
                    // Local validation: field-level feedback, no network.
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
            Some(Finalize::Commit(value)) => self.commit_inline(value).await,
        }
    }

    /// Execute the committed inline edit with the full current record. The
    /// displayed value changes only after the store confirms.
    async fn commit_inline(&mut self, value: String) -> CatalogResult<()> {
        let Some(session) = self.inline.as_ref() else {
            return Ok(());
        };
        let id = session.product_id().to_string();
        let field = session.field();

        let Some(row) = self.catalog.get(&id) else {
            self.finish_inline(false);
            return Err(CatalogError::NotFound);
        };
        let draft = draft_with_edit(&row.product, field, &value);

        let token = self.catalog.generation();
        let result = self
            .coordinator
            .update(&id, &draft, &self.subcategories)
            .await;

        if !self.catalog.is_live(token) {
            tracing::warn!(id, "discarding inline edit result for a superseded view");
            self.inline = None;
            return Ok(());
        }

        match result {
            Ok(confirmed) => {
                self.catalog.upsert_confirmed(confirmed);
                self.finish_inline(true);
                Ok(())
            }
            Err(e) => {
                // One row-level message; remote field maps ride along in the
                // error value.
                self.finish_inline(false);
                Err(e)
            }
        }
    }

    fn finish_inline(&mut self, committed: bool) {
        if let Some(session) = self.inline.as_mut() {
            if committed {
                session.complete();
            } else {
                session.fail();
            }
        }
        self.inline = None;
    }

    fn clear_inline(&mut self) {
        self.inline = None;
    }

    // ==================== Deletion ====================

    /// Two-phase delete. The first request on a row arms it; the second
    /// executes the optimistic removal plus the remote delete. A failed
    /// delete reinserts the row at its original index.
    pub async fn request_delete(&mut self, id: &str) -> CatalogResult<DeleteOutcome> {
        if self.deleting {
            return Ok(DeleteOutcome::Ignored);
        }
        if !self.delete_arm.request(id) {
            return Ok(DeleteOutcome::Armed);
        }

        let Some(command) = self.catalog.remove_optimistic(id) else {
            return Err(CatalogError::NotFound);
        };

        self.deleting = true;
        let token = self.catalog.generation();
        let result = self.coordinator.remove(id).await;
        self.deleting = false;

        if !self.catalog.is_live(token) {
            tracing::warn!(id, "discarding delete result for a superseded view");
            return Ok(DeleteOutcome::Ignored);
        }

        match result {
            Ok(()) => {
                self.catalog.confirm(command, None);
                self.paginator.set_total_items(self.catalog.total_items());
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                self.catalog.rollback(command);
                Err(e)
            }
        }
    }

    // ==================== Forms ====================

    /// Open an empty create form.
    pub fn open_create_form(&mut self) -> ProductFormSession {
        self.delete_arm.disarm();
        ProductFormSession::create()
    }

    /// Open an edit form for a row on the current page.
    pub fn open_edit_form(&mut self, id: &str) -> Option<ProductFormSession> {
        self.delete_arm.disarm();
        self.catalog
            .get(id)
            .map(|row| ProductFormSession::edit(&row.product))
    }

    /// Submit a form through the coordinator. Returns `Ok(None)` when the
    /// submit was refused (already in flight, or the form is closed).
    ///
    /// New uploads ride in the form's [`crate::PhotoSubmission`]; handing
    /// the raw files to the storage collaborator is the host's job.
    pub async fn submit_form(
        &mut self,
        form: &mut ProductFormSession,
    ) -> CatalogResult<Option<Product>> {
        if !form.begin_submit() {
            return Ok(None);
        }
        self.delete_arm.disarm();

        let (draft, _uploads) = form.draft_for_submit();
        let valid = match validate_draft(&draft, &self.subcategories) {
            Ok(valid) => valid,
            Err(e) => {
                form.end_submit();
                return Err(e);
            }
        };

        let token = self.catalog.generation();
        let outcome = match form.target().clone() {
            FormTarget::Create => {
                let result = self.coordinator.create_valid(&valid).await;
                match result {
                    Ok(product) => {
                        if self.catalog.is_live(token) {
                            self.catalog.upsert_confirmed(product.clone());
                            self.paginator.set_total_items(self.catalog.total_items());
                        } else {
                            tracing::warn!(id = %product.id, "created record lands on a superseded view");
                        }
                        Ok(Some(product))
                    }
                    Err(e) => Err(e),
                }
            }
            FormTarget::Edit { id } => {
                // Optimistic apply: snapshot the row, show the tentative
                // state speculatively, reconcile below.
                let tentative = self.catalog.get(&id).map(|row| {
                    let mut product = row.product.clone();
                    valid.apply_to(&mut product);
                    product
                });
                let command = tentative.and_then(|t| self.catalog.replace_optimistic(t));

                let result = self.coordinator.update_valid(&id, &valid).await;

                if !self.catalog.is_live(token) {
                    tracing::warn!(id, "discarding update result for a superseded view");
                    Ok(None)
                } else {
                    match result {
                        Ok(product) => {
                            match command {
                                Some(command) => {
                                    self.catalog.confirm(command, Some(product.clone()))
                                }
                                None => self.catalog.upsert_confirmed(product.clone()),
                            }
                            Ok(Some(product))
                        }
                        Err(e) => {
                            if let Some(command) = command {
                                self.catalog.rollback(command);
                            }
                            Err(e)
                        }
                    }
                }
            }
        };

        form.end_submit();
        outcome
    }
}

fn decode_vec<T: DeserializeOwned>(items: Vec<Value>) -> CatalogResult<Vec<T>> {
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| CatalogError::Unknown(format!("malformed record: {e}")))
        })
        .collect()
}

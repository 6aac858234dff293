//! In-place cell editing
//!
//! A session edits exactly one field of one row. Two trigger classes can end
//! it: an explicit key action (Enter commits, Escape cancels) and loss of
//! focus, which the host defers by a short grace period before calling
//! [`InlineEditSession::resolve_blur`]. A one-shot finalize guard ensures
//! exactly one finalize transition per session no matter how the triggers
//! race.
//!
//! Inline commits are never optimistic: the displayed value changes only
//! after the server confirms, so it always reflects server-accepted truth.

use crate::mutation::parse_price;
use shared::models::{Product, ProductDraft};
use shared::{CatalogError, CatalogResult};

/// Which product field a session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Price,
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Capturing keystrokes
    Editing,
    /// Awaiting the mutation result
    Committing,
    /// Terminal: server accepted
    Committed,
    /// Terminal: cancelled or aborted
    Cancelled,
}

/// Outcome of a finalize trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Finalize {
    /// Pending value passed field validation; drive the full-record update,
    /// then call [`InlineEditSession::complete`] or
    /// [`InlineEditSession::fail`].
    Commit(String),
    /// Session ended locally. Carries the validation error when invalid
    /// input aborted it; the displayed field stays unchanged either way.
    Cancelled(Option<CatalogError>),
}

/// Per-field edit state machine with a one-shot finalize guard.
#[derive(Debug)]
pub struct InlineEditSession {
    product_id: String,
    field: EditField,
    /// Revert target, snapshotted when the edit started.
    original: String,
    pending: String,
    phase: EditPhase,
    blur_deferred: bool,
    /// One-shot guard: set by the first finalize trigger, suppresses every
    /// later one.
    finalized: bool,
}

impl InlineEditSession {
    /// Start editing a field, snapshotting its current value.
    pub fn start(product: &Product, field: EditField) -> Self {
        let original = match field {
            EditField::Name => product.name.clone(),
            EditField::Price => product.price.to_string(),
        };
        Self {
            product_id: product.id.clone(),
            field,
            pending: original.clone(),
            original,
            phase: EditPhase::Editing,
            blur_deferred: false,
            finalized: false,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Replace the pending value. Ignored once a finalize has started.
    pub fn input(&mut self, value: impl Into<String>) {
        if self.phase == EditPhase::Editing {
            self.pending = value.into();
        }
    }

    /// Enter: attempt to commit now.
    pub fn key_enter(&mut self) -> Option<Finalize> {
        self.finalize()
    }

    /// Escape: cancel the session. No effect if a finalize already ran —
    /// a commit in flight keeps going.
    pub fn key_escape(&mut self) -> Option<Finalize> {
        if !self.begin_finalize() {
            return None;
        }
        self.phase = EditPhase::Cancelled;
        Some(Finalize::Cancelled(None))
    }

    /// Focus left the cell; the commit is deferred until the host's grace
    /// period elapses and it calls [`Self::resolve_blur`].
    pub fn blur(&mut self) {
        if self.phase == EditPhase::Editing {
            self.blur_deferred = true;
        }
    }

    /// Fire the deferred blur-commit. Suppressed when Escape (or Enter)
    /// already finalized the session.
    pub fn resolve_blur(&mut self) -> Option<Finalize> {
        if !self.blur_deferred {
            return None;
        }
        self.blur_deferred = false;
        self.finalize()
    }

    /// The update succeeded; the session is over.
    pub fn complete(&mut self) {
        if self.phase == EditPhase::Committing {
            self.phase = EditPhase::Committed;
        }
    }

    /// The update failed; the displayed field stays at the revert target.
    pub fn fail(&mut self) {
        if self.phase == EditPhase::Committing {
            self.phase = EditPhase::Cancelled;
        }
    }

    /// Claim the one-shot guard. False when a finalize already happened.
    fn begin_finalize(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        true
    }

    fn finalize(&mut self) -> Option<Finalize> {
        if !self.begin_finalize() {
            return None;
        }
        match self.validate() {
            Ok(value) => {
                self.phase = EditPhase::Committing;
                Some(Finalize::Commit(value))
            }
            Err(err) => {
                // Invalid input aborts locally: pending value discarded, no
                // remote call.
                self.phase = EditPhase::Cancelled;
                Some(Finalize::Cancelled(Some(err)))
            }
        }
    }

    /// Field validation mirroring the mutation coordinator's rules.
    fn validate(&self) -> CatalogResult<String> {
        match self.field {
            EditField::Name => {
                let trimmed = self.pending.trim();
                if trimmed.is_empty() {
                    Err(CatalogError::validation("name", "Name cannot be empty"))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            EditField::Price => {
                parse_price(&self.pending)?;
                Ok(self.pending.trim().to_string())
            }
        }
    }
}

/// Full-record draft with the edited field replaced; everything else comes
/// from the current record because the store validates all required fields.
pub fn draft_with_edit(product: &Product, field: EditField, value: &str) -> ProductDraft {
    let mut draft = ProductDraft::from_product(product);
    match field {
        EditField::Name => draft.name = value.to_string(),
        EditField::Price => draft.price = value.to_string(),
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProductStatus;

    fn product() -> Product {
        Product {
            id: "p1".into(),
            product_id: "SKU-1".into(),
            name: "Widget".into(),
            description: None,
            price: 100.0,
            status: ProductStatus::Active,
            brand: "b1".into(),
            category: "c1".into(),
            subcategory: None,
            photos: Vec::new(),
            created: None,
            updated: None,
        }
    }

    #[test]
    fn enter_commits_valid_price() {
        let mut session = InlineEditSession::start(&product(), EditField::Price);
        assert_eq!(session.original(), "100");
        session.input("150");
        assert_eq!(session.key_enter(), Some(Finalize::Commit("150".into())));
        assert_eq!(session.phase(), EditPhase::Committing);
        session.complete();
        assert_eq!(session.phase(), EditPhase::Committed);
    }

    #[test]
    fn invalid_input_aborts_locally() {
        for (field, bad) in [(EditField::Name, "   "), (EditField::Price, "-5")] {
            let mut session = InlineEditSession::start(&product(), field);
            session.input(bad);
            match session.key_enter() {
                Some(Finalize::Cancelled(Some(CatalogError::Validation { .. }))) => {}
                other => panic!("expected local validation abort, got {other:?}"),
            }
            assert_eq!(session.phase(), EditPhase::Cancelled);
        }
    }

    #[test]
    fn escape_before_deferred_blur_suppresses_the_commit() {
        let mut session = InlineEditSession::start(&product(), EditField::Name);
        session.input("Gadget");
        session.blur();

        // Escape wins the race; the deferred blur-commit must not fire.
        assert_eq!(session.key_escape(), Some(Finalize::Cancelled(None)));
        assert_eq!(session.resolve_blur(), None);
        assert_eq!(session.phase(), EditPhase::Cancelled);
    }

    #[test]
    fn blur_commit_then_escape_has_no_further_effect() {
        let mut session = InlineEditSession::start(&product(), EditField::Name);
        session.input("Gadget");
        session.blur();

        assert_eq!(
            session.resolve_blur(),
            Some(Finalize::Commit("Gadget".into()))
        );
        // Commit already started: Escape is a no-op.
        assert_eq!(session.key_escape(), None);
        assert_eq!(session.phase(), EditPhase::Committing);
    }

    #[test]
    fn exactly_one_finalize_even_when_both_triggers_fire() {
        let mut session = InlineEditSession::start(&product(), EditField::Name);
        session.input("Gadget");
        session.blur();

        let outcomes = [
            session.key_enter(),
            session.resolve_blur(),
            session.key_escape(),
        ];
        assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
    }

    #[test]
    fn input_is_frozen_after_finalize() {
        let mut session = InlineEditSession::start(&product(), EditField::Name);
        session.input("Gadget");
        session.key_enter();
        session.input("Late");
        assert_eq!(session.pending(), "Gadget");
    }

    #[test]
    fn draft_with_edit_replaces_only_the_edited_field() {
        let p = product();
        let draft = draft_with_edit(&p, EditField::Price, "150");
        assert_eq!(draft.price, "150");
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.product_id, "SKU-1");
    }
}

//! Modal create/edit form session
//!
//! Full-form submission locks the entire form to prevent duplicate submits;
//! everything else only disables the specific control involved. Closing the
//! form releases preview resources but does not cancel an in-flight call —
//! the console discards a result whose session is gone.

use crate::photos::{PhotoOrderManager, PhotoSubmission};
use shared::models::{Product, ProductDraft};

/// Whether the form creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit { id: String },
}

/// One open product form.
#[derive(Debug)]
pub struct ProductFormSession {
    target: FormTarget,
    pub draft: ProductDraft,
    pub photos: PhotoOrderManager,
    /// Whole-form lock while a submit is in flight.
    submitting: bool,
    closed: bool,
}

impl ProductFormSession {
    /// Open an empty create form.
    pub fn create() -> Self {
        Self {
            target: FormTarget::Create,
            draft: ProductDraft::default(),
            photos: PhotoOrderManager::new(),
            submitting: false,
            closed: false,
        }
    }

    /// Open an edit form seeded with the product's full record.
    pub fn edit(product: &Product) -> Self {
        Self {
            target: FormTarget::Edit {
                id: product.id.clone(),
            },
            draft: ProductDraft::from_product(product),
            photos: PhotoOrderManager::from_existing(product.photos.clone()),
            submitting: false,
            closed: false,
        }
    }

    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Engage the whole-form lock. False when a submit is already in flight
    /// or the form is closed; the caller must treat that as a no-op.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting || self.closed {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Release the lock once the submit settled, success or failure.
    pub fn end_submit(&mut self) {
        self.submitting = false;
    }

    /// Draft with the authoritative photo order folded in, plus the keyed
    /// upload entries for the storage collaborator.
    pub fn draft_for_submit(&self) -> (ProductDraft, PhotoSubmission) {
        let submission = self.photos.submission();
        let mut draft = self.draft.clone();
        draft.photos = submission.photos.clone();
        (draft, submission)
    }

    /// Close the editing surface, releasing preview resources. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.photos.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

//! Urchin Console - catalog view-and-mutation engine
//!
//! Translates filter selections into query predicates, maintains the
//! paginated client-side view of the catalog, applies optimistic mutations
//! with rollback on failure, and manages ordered photo lists under
//! drag-and-drop reordering.
//!
//! The engine is single-threaded and event-driven; it suspends only while
//! awaiting the remote record store behind [`urchin_client::RecordStore`].

pub mod catalog;
pub mod console;
pub mod filter;
pub mod form;
pub mod inline;
pub mod mutation;
pub mod pagination;
pub mod photos;
pub mod view_mode;

pub use catalog::{CatalogStore, OptimisticCommand, Row};
pub use console::{CatalogConsole, DeleteOutcome, InlineTrigger};
pub use filter::{FilterState, translate};
pub use form::{FormTarget, ProductFormSession};
pub use inline::{EditField, EditPhase, Finalize, InlineEditSession};
pub use mutation::{DeleteArm, MutationCoordinator, ValidDraft, validate_draft};
pub use pagination::{PAGE_SIZE, Paginator};
pub use photos::{PhotoOrderManager, PhotoSubmission, reorder};
pub use view_mode::{FilePrefs, PreferenceStore, ViewMode};

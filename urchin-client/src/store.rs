//! The record-store seam
//!
//! The console core is written against this trait, so tests can substitute an
//! in-memory store and the wire protocol stays an external concern.

use crate::error::StoreResult;
use async_trait::async_trait;
use serde_json::Value;
use shared::query::{ListQuery, ListResult};

/// Remote record-store operations the console depends on.
///
/// Records cross this boundary as raw JSON values; callers decode them into
/// typed models. The filter grammar is owned by the implementation — callers
/// only supply structured [`shared::Predicate`] constraint sets.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one page of a collection.
    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> StoreResult<ListResult<Value>>;

    /// Fetch an entire collection, unpaginated. Used for lookup tables
    /// (brands, categories, subcategories).
    async fn full_list(&self, collection: &str, sort: &str) -> StoreResult<Vec<Value>>;

    /// Create a record and return it as stored.
    async fn create(&self, collection: &str, data: Value) -> StoreResult<Value>;

    /// Replace a record's fields and return the stored result.
    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Value>;

    /// Delete a record.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}

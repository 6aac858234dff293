//! Client-side cache of the current catalog page
//!
//! The store is the single source of truth for rendering. It changes only
//! through confirmed server results ([`CatalogStore::set_page`],
//! [`CatalogStore::upsert_confirmed`]) or an armed optimistic transition
//! that is always reconciled later ([`CatalogStore::confirm`] /
//! [`CatalogStore::rollback`]). No other path writes it.

use shared::models::Product;
use shared::util::now_millis;

/// One cached row.
#[derive(Debug, Clone)]
pub struct Row {
    pub product: Product,
    /// True while an in-flight optimistic mutation owns this row.
    pub speculative: bool,
}

/// Snapshot-based optimistic transition.
///
/// Capture the pre-transition state, apply the tentative change, then either
/// replace it with the confirmed result or restore the snapshot. The
/// snapshot and the live rows never diverge outside this cycle.
#[derive(Debug)]
pub enum OptimisticCommand {
    /// Row removed from `index`; restored there on rollback, not appended.
    Removed { index: usize, product: Product },
    /// Row at `index` replaced; the previous value is the snapshot.
    Replaced { index: usize, previous: Product },
}

/// Page cache for the catalog listing.
#[derive(Debug, Default)]
pub struct CatalogStore {
    rows: Vec<Row>,
    total_items: u64,
    fetched_at: i64,
    /// Liveness counter; results stamped with an older generation are
    /// discarded instead of being applied to unrelated state.
    generation: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a page load, invalidating every outstanding response. Returns
    /// the token the response must present.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self, token: u64) -> bool {
        token == self.generation
    }

    /// Apply a confirmed page if its originating load is still the latest.
    /// Returns false when the response was discarded as stale.
    pub fn set_page(&mut self, token: u64, products: Vec<Product>, total_items: u64) -> bool {
        if !self.is_live(token) {
            tracing::warn!(
                token,
                current = self.generation,
                "discarding stale page result"
            );
            return false;
        }
        self.rows = products
            .into_iter()
            .map(|product| Row {
                product,
                speculative: false,
            })
            .collect();
        self.total_items = total_items;
        self.fetched_at = now_millis();
        true
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Millisecond timestamp of the last confirmed page.
    pub fn fetched_at(&self) -> i64 {
        self.fetched_at
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.product.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.product.id == id)
    }

    /// Replace a row with its confirmed server state, clearing any
    /// speculative tag. Unknown ids are inserted at the front (fresh
    /// creations sort newest-first).
    pub fn upsert_confirmed(&mut self, product: Product) {
        match self.index_of(&product.id) {
            Some(index) => {
                self.rows[index] = Row {
                    product,
                    speculative: false,
                };
            }
            None => {
                self.rows.insert(
                    0,
                    Row {
                        product,
                        speculative: false,
                    },
                );
                self.total_items += 1;
            }
        }
    }

    /// Optimistically remove a row, returning the command that confirms or
    /// restores it. `None` when the row is not on this page.
    pub fn remove_optimistic(&mut self, id: &str) -> Option<OptimisticCommand> {
        let index = self.index_of(id)?;
        let row = self.rows.remove(index);
        Some(OptimisticCommand::Removed {
            index,
            product: row.product,
        })
    }

    /// Optimistically replace a row, tagging it speculative until the
    /// mutation is acknowledged.
    pub fn replace_optimistic(&mut self, product: Product) -> Option<OptimisticCommand> {
        let index = self.index_of(&product.id)?;
        let previous = std::mem::replace(
            &mut self.rows[index],
            Row {
                product,
                speculative: true,
            },
        );
        Some(OptimisticCommand::Replaced {
            index,
            previous: previous.product,
        })
    }

    /// Reconcile an optimistic transition with the server's answer.
    ///
    /// For a removal the snapshot is simply dropped; for a replacement the
    /// confirmed record becomes the row's state.
    pub fn confirm(&mut self, command: OptimisticCommand, confirmed: Option<Product>) {
        match command {
            OptimisticCommand::Removed { .. } => {
                self.total_items = self.total_items.saturating_sub(1);
            }
            OptimisticCommand::Replaced { index, .. } => {
                if let Some(product) = confirmed {
                    if let Some(row) = self.rows.get_mut(index) {
                        *row = Row {
                            product,
                            speculative: false,
                        };
                    }
                }
            }
        }
    }

    /// Restore the pre-transition snapshot after a failed mutation. A
    /// removed row goes back to its original index.
    pub fn rollback(&mut self, command: OptimisticCommand) {
        match command {
            OptimisticCommand::Removed { index, product } => {
                tracing::warn!(id = %product.id, index, "rolling back optimistic removal");
                let index = index.min(self.rows.len());
                self.rows.insert(
                    index,
                    Row {
                        product,
                        speculative: false,
                    },
                );
            }
            OptimisticCommand::Replaced { index, previous } => {
                tracing::warn!(id = %previous.id, "rolling back optimistic replace");
                if let Some(row) = self.rows.get_mut(index) {
                    *row = Row {
                        product: previous,
                        speculative: false,
                    };
                }
            }
        }
    }
}

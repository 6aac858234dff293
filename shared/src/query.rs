//! Query predicate and list types
//!
//! The console produces structured constraint sets; the record-store client
//! owns turning them into the store's filter grammar. [`Predicate::matches`]
//! defines the reference semantics both sides must agree on.

use serde::{Deserialize, Serialize};

/// Fields a search token is matched against.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "productId", "description"];

/// A single query constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Case-insensitive substring search: every token must match at least one
    /// of [`SEARCH_FIELDS`]; tokens are AND-combined. Tokens are stored
    /// lowercased.
    Search(Vec<String>),
    /// Exact equality on a single field
    Eq { field: String, value: String },
}

impl Constraint {
    /// Equality constraint builder
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate this constraint against a record exposed through a field
    /// accessor. Missing fields never match.
    pub fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Constraint::Search(tokens) => tokens.iter().all(|token| {
                SEARCH_FIELDS.iter().any(|field| {
                    lookup(field).is_some_and(|value| value.to_lowercase().contains(token.as_str()))
                })
            }),
            Constraint::Eq { field, value } => {
                lookup(field).is_some_and(|actual| actual == *value)
            }
        }
    }
}

/// An immutable set of constraints, AND-combined
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate(Vec<Constraint>);

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.0.push(constraint);
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.push(constraint);
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluate all constraints against a record exposed through a field
    /// accessor. An empty predicate matches everything.
    pub fn matches<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        self.0.iter().all(|constraint| constraint.matches(&lookup))
    }
}

/// Parameters for a paginated list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Sort expression owned by the store (e.g. "-created")
    pub sort: Option<String>,
    pub predicate: Predicate,
    /// Relations to expand (e.g. "brand,category")
    pub expand: Option<String>,
}

impl ListQuery {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            sort: None,
            predicate,
            expand: None,
        }
    }

    pub fn order_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn expand(mut self, relations: impl Into<String>) -> Self {
        self.expand = Some(relations.into());
        self
    }
}

/// One page of records from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> ListResult<T> {
    /// Build a page, deriving `total_pages = ceil(total/per_page)`, never
    /// less than one.
    pub fn new(items: Vec<T>, total_items: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page > 0 {
            (total_items.div_ceil(per_page as u64) as u32).max(1)
        } else {
            1
        };
        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Convert every item, keeping the page metadata.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<ListResult<U>, E> {
        Ok(ListResult {
            items: self
                .items
                .into_iter()
                .map(f)
                .collect::<Result<Vec<_>, E>>()?,
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        })
    }
}

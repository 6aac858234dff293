//! HTTP record-store client
//!
//! Speaks the remote store's record API and renders structured predicates
//! into its filter grammar. All status classification happens in
//! [`HttpStore::handle_response`] so every call maps failures the same way.

use crate::{ClientConfig, StoreError, StoreResult};
use async_trait::async_trait;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::FieldErrors;
use shared::query::{Constraint, ListQuery, ListResult, Predicate, SEARCH_FIELDS};

/// Page size used when draining a full collection.
const FULL_LIST_BATCH: u32 = 200;

/// HTTP client for the remote record store
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Create a new store client from configuration
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{}/records", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.records_url(collection), id)
    }

    /// Attach the bearer header when a token is present; absent token means
    /// an anonymous caller.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            ),
            None => request,
        }
    }

    /// Classify the HTTP response into [`StoreError`] or decode the body.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(StoreError::Unauthorized),
                StatusCode::NOT_FOUND => Err(StoreError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(StoreError::Validation(parse_field_errors(&text))),
                _ => Err(StoreError::Internal {
                    status: status.as_u16(),
                    message: text,
                }),
            };
        }

        response.json().await.map_err(Into::into)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> StoreResult<ListResult<Value>> {
        let mut params = vec![
            ("page".to_string(), page.to_string()),
            ("perPage".to_string(), per_page.to_string()),
        ];
        if let Some(sort) = &query.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(expand) = &query.expand {
            params.push(("expand".to_string(), expand.clone()));
        }
        let filter = encode_predicate(&query.predicate);
        if !filter.is_empty() {
            params.push(("filter".to_string(), filter));
        }

        tracing::debug!(collection, page, per_page, "listing records");
        let request = self.client.get(self.records_url(collection)).query(&params);
        let response = self.authorized(request).send().await?;
        Self::handle_response(response).await
    }
}

#[async_trait]
impl crate::RecordStore for HttpStore {
    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> StoreResult<ListResult<Value>> {
        self.fetch_page(collection, page, per_page, query).await
    }

    async fn full_list(&self, collection: &str, sort: &str) -> StoreResult<Vec<Value>> {
        let query = ListQuery::default().order_by(sort);
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let result = self
                .fetch_page(collection, page, FULL_LIST_BATCH, &query)
                .await?;
            let total_pages = result.total_pages;
            items.extend(result.items);
            if page >= total_pages {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    async fn create(&self, collection: &str, data: Value) -> StoreResult<Value> {
        let request = self.client.post(self.records_url(collection)).json(&data);
        let response = self.authorized(request).send().await?;
        Self::handle_response(response).await
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Value> {
        let request = self
            .client
            .patch(self.record_url(collection, id))
            .json(&data);
        let response = self.authorized(request).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let request = self.client.delete(self.record_url(collection, id));
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Reuse the classification path; the body is an error payload here.
        Self::handle_response::<Value>(response).await.map(|_| ())
    }
}

/// Render a constraint set into the store's filter grammar.
///
/// Each search token becomes an OR across the searchable fields; tokens and
/// the remaining constraints are AND-combined. A single token produces the
/// same shape the multi-token path produces for one token.
pub fn encode_predicate(predicate: &Predicate) -> String {
    let mut parts = Vec::new();
    for constraint in predicate.constraints() {
        match constraint {
            Constraint::Search(tokens) => {
                let mut token_filters: Vec<String> = tokens
                    .iter()
                    .map(|token| {
                        let fields: Vec<String> = SEARCH_FIELDS
                            .iter()
                            .map(|field| format!("{} ~ \"{}\"", field, escape_value(token)))
                            .collect();
                        format!("({})", fields.join(" || "))
                    })
                    .collect();
                if token_filters.is_empty() {
                    continue;
                }
                if token_filters.len() == 1 {
                    parts.push(token_filters.remove(0));
                } else {
                    parts.push(format!("({})", token_filters.join(" && ")));
                }
            }
            Constraint::Eq { field, value } => {
                parts.push(format!("{} = \"{}\"", field, escape_value(value)));
            }
        }
    }
    parts.join(" && ")
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Pull the field-error map out of a 400 body.
///
/// The store answers validation failures with
/// `{"message": "...", "data": {"<field>": {"message": "..."}}}`; when no
/// per-field map is present the top-level message is kept under `message`.
fn parse_field_errors(body: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(data) = value.get("data").and_then(Value::as_object) {
            for (field, detail) in data {
                let message = detail
                    .get("message")
                    .and_then(Value::as_str)
                    .or_else(|| detail.as_str())
                    .unwrap_or("invalid value");
                errors.insert(field.clone(), message.to_string());
            }
        }
        if errors.is_empty() {
            if let Some(message) = value.get("message").and_then(Value::as_str) {
                errors.insert("message".to_string(), message.to_string());
            }
        }
    }
    if errors.is_empty() {
        errors.insert("message".to_string(), body.to_string());
    }
    errors
}

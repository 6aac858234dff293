//! In-memory record store for console integration tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use shared::query::{ListQuery, ListResult};
use urchin_client::{RecordStore, StoreError, StoreResult};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("urchin_console=debug")
        .with_test_writer()
        .try_init();
}

/// In-memory store with failure injection. The next call consumes an
/// injected error before touching any data.
#[derive(Default)]
pub struct MockStore {
    records: Mutex<HashMap<String, Vec<Value>>>,
    fail_next: Mutex<Option<StoreError>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, collection: &str, items: Vec<Value>) {
        self.records
            .lock()
            .unwrap()
            .insert(collection.to_string(), items);
    }

    /// Make the next store call fail with `err`.
    pub fn inject_failure(&self, err: StoreError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn record(&self, collection: &str, id: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .get(collection)?
            .iter()
            .find(|r| r["id"] == id)
            .cloned()
    }

    fn track(&self, call: impl Into<String>) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call.into());
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn items(&self, collection: &str) -> Vec<Value> {
        self.records
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn field_of(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl RecordStore for MockStore {
    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> StoreResult<ListResult<Value>> {
        self.track(format!("list:{collection}"))?;
        let matching: Vec<Value> = self
            .items(collection)
            .into_iter()
            .filter(|record| query.predicate.matches(|field| field_of(record, field)))
            .collect();

        let total = matching.len() as u64;
        let start = ((page - 1) * per_page) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Ok(ListResult::new(items, total, page, per_page))
    }

    async fn full_list(&self, collection: &str, _sort: &str) -> StoreResult<Vec<Value>> {
        self.track(format!("full_list:{collection}"))?;
        Ok(self.items(collection))
    }

    async fn create(&self, collection: &str, data: Value) -> StoreResult<Value> {
        self.track(format!("create:{collection}"))?;
        let id = format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut record = data;
        record["id"] = json!(id);
        self.records
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<Value> {
        self.track(format!("update:{collection}:{id}"))?;
        let mut records = self.records.lock().unwrap();
        let items = records
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;
        let record = items
            .iter_mut()
            .find(|r| r["id"] == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(fields) = data.as_object() {
            for (key, value) in fields {
                record[key] = value.clone();
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.track(format!("delete:{collection}:{id}"))?;
        let mut records = self.records.lock().unwrap();
        let items = records
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;
        let index = items
            .iter()
            .position(|r| r["id"] == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        items.remove(index);
        Ok(())
    }
}

/// A product record in store shape.
pub fn product_record(id: &str, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "productId": format!("SKU-{id}"),
        "name": name,
        "description": "",
        "price": price,
        "status": "active",
        "brand": "b1",
        "category": "c1",
        "photos": [],
    })
}

//! In-process [`DocumentStore`] used by tests and dry runs.

use crate::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// HashMap-backed store. Writes are counted so idempotence is observable
/// from the outside.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<String, Value>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls that have reached this store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of documents currently held in `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .expect("memory store lock poisoned")
            .get(collection)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let collections = self.collections.lock().expect("memory store lock poisoned");
        Ok(collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id)))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.lock().expect("memory store lock poisoned");
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("memory store lock poisoned");
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn absent_documents_read_as_none() {
        let store = MemoryStore::new();
        assert!(!store.exists("advisories", "alert_x").await.unwrap());
        assert!(store.get("advisories", "alert_x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        let doc = json!({ "title": "Cyclone Alert", "date": "1 Jun 2024" });

        store.set("advisories", "alert_abc", &doc).await.unwrap();

        assert!(store.exists("advisories", "alert_abc").await.unwrap());
        assert_eq!(
            store.get("advisories", "alert_abc").await.unwrap(),
            Some(doc)
        );
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.document_count("advisories"), 1);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store
            .set("advisories", "alert_abc", &json!({ "t": "a" }))
            .await
            .unwrap();

        assert!(!store.exists("other", "alert_abc").await.unwrap());
        assert_eq!(store.document_count("other"), 0);
    }
}

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError};

/// In-memory document store. Backs tests and deployments without a
/// DATABASE_URL; contents vanish on shutdown.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<Uuid, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(doc: &Value, field: &str, value: &Value) -> bool {
    match doc.get(field) {
        Some(Value::Array(items)) => items.iter().any(|item| item == value),
        Some(found) => found == value,
        None => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, doc);
        Ok(())
    }

    async fn fetch(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get_mut(&id) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "{} {} not found",
                collection, id
            ))),
        }
    }

    async fn remove(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!(
                "{} {} not found",
                collection, id
            ))),
        }
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches(doc, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_fetch_remove_roundtrip() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .insert("clients", id, json!({"name": "Acme"}))
            .await
            .unwrap();

        let doc = store.fetch("clients", id).await.unwrap().unwrap();
        assert_eq!(doc["name"], "Acme");

        store.remove("clients", id).await.unwrap();
        assert!(store.fetch("clients", id).await.unwrap().is_none());
        assert!(matches!(
            store.remove("clients", id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn replace_requires_existing_document() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.replace("tasks", id, json!({})).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_by_field_handles_scalars_and_arrays() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let staff = Uuid::new_v4();
        store
            .insert("projects", a, json!({"title": "Roof", "assignedStaff": [staff]}))
            .await
            .unwrap();
        store
            .insert("projects", b, json!({"title": "Deck", "assignedStaff": []}))
            .await
            .unwrap();

        let by_title = store
            .find_by_field("projects", "title", &json!("Roof"))
            .await
            .unwrap();
        assert_eq!(by_title.len(), 1);

        let by_staff = store
            .find_by_field("projects", "assignedStaff", &json!(staff))
            .await
            .unwrap();
        assert_eq!(by_staff.len(), 1);
        assert_eq!(by_staff[0]["title"], "Roof");
    }
}

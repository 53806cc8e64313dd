pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors from document store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A persisted document type. Each implementor owns one named collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Backend-agnostic document store: six independent collections of JSON
/// documents keyed by id. Single-document writes only; last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError>;

    async fn fetch(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Replace a document wholesale. `NotFound` if the id does not exist.
    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError>;

    /// Hard delete. `NotFound` if the id does not exist.
    async fn remove(&self, collection: &str, id: Uuid) -> Result<(), StoreError>;

    /// Find documents where `field` equals `value`, or where `field` is an
    /// array containing `value`. Field names are the wire (camelCase) names.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn health(&self) -> Result<(), StoreError>;
}

/// Typed handle over one collection of a `DocumentStore`, doing the serde
/// round-trip so services work with concrete record types.
pub struct Collection<'s, T> {
    store: &'s dyn DocumentStore,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<'s, T: Document> Collection<'s, T> {
    pub fn new(store: &'s dyn DocumentStore) -> Self {
        Self {
            store,
            _marker: std::marker::PhantomData,
        }
    }

    pub async fn insert(&self, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        self.store.insert(T::COLLECTION, doc.id(), value).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match self.store.fetch(T::COLLECTION, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn get_404(&self, id: Uuid) -> Result<T, StoreError> {
        self.get(id).await?.ok_or_else(|| {
            StoreError::NotFound(format!("{} {} not found", T::COLLECTION, id))
        })
    }

    pub async fn all(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }

    /// Persist in-place changes to an existing document.
    pub async fn save(&self, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        self.store.replace(T::COLLECTION, doc.id(), value).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.remove(T::COLLECTION, id).await
    }

    pub async fn find_eq(&self, field: &str, value: Value) -> Result<Vec<T>, StoreError> {
        self.store
            .find_by_field(T::COLLECTION, field, &value)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }
}

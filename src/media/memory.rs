use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::{MediaError, ObjectStorage, StoredObject};

/// In-process object store used by tests and DATABASE_URL-less deployments.
/// Bytes are held in memory; urls use a `memory://` scheme.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    counter: AtomicU64,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object is currently held. Test hook for verifying that
    /// deletes and replaces keep ids in sync.
    pub async fn contains(&self, public_id: &str) -> bool {
        self.objects.read().await.contains_key(public_id)
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        name: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredObject, MediaError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let public_id = format!("mem/{}-{}", n, name);
        let url = format!("memory://{}", public_id);

        self.objects.write().await.insert(public_id.clone(), data);
        Ok(StoredObject { url, public_id })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        match self.objects.write().await.remove(public_id) {
            Some(_) => Ok(()),
            None => Err(MediaError::NotFound(public_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_delete_lifecycle() {
        let storage = MemoryObjectStorage::new();
        let stored = storage
            .upload("site.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(storage.contains(&stored.public_id).await);

        storage.delete(&stored.public_id).await.unwrap();
        assert!(!storage.contains(&stored.public_id).await);
        assert!(matches!(
            storage.delete(&stored.public_id).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn replace_swaps_the_stored_object() {
        let storage = MemoryObjectStorage::new();
        let old = storage
            .upload("a.jpg", "image/jpeg", vec![1])
            .await
            .unwrap();
        let new = storage
            .replace(&old.public_id, "b.jpg", "image/jpeg", vec![2])
            .await
            .unwrap();

        assert_ne!(old.public_id, new.public_id);
        assert!(!storage.contains(&old.public_id).await);
        assert!(storage.contains(&new.public_id).await);
    }
}

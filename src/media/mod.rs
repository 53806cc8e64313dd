pub mod http;
pub mod memory;

pub use http::HttpObjectStorage;
pub use memory::MemoryObjectStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to a file held by the external object store. The `public_id` is
/// the only way to address the object later; the persisted copy of it must
/// stay in sync with what the store actually holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("object storage request failed: {0}")]
    Request(String),

    #[error("object storage rejected the upload: {0}")]
    Rejected(String),

    #[error("stored object not found: {0}")]
    NotFound(String),
}

/// Thin wrapper over the external object-storage service. All transformation
/// and serving is the remote side's business; this trait only keeps ids and
/// bytes moving.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredObject, MediaError>;

    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;

    /// Swap the stored file behind a public id. The old object is deleted
    /// first so a failed upload can never leave two live objects behind
    /// one persisted id.
    async fn replace(
        &self,
        public_id: &str,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredObject, MediaError> {
        self.delete(public_id).await?;
        self.upload(name, content_type, data).await
    }
}

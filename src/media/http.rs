use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MediaConfig;

use super::{MediaError, ObjectStorage, StoredObject};

/// Client for the hosted object-storage HTTP API. Uploads go to
/// `POST {api_url}/upload` as multipart; deletes to
/// `DELETE {api_url}/objects/{public_id}`.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    public_id: String,
}

impl HttpObjectStorage {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            folder: config.folder.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredObject, MediaError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(name.to_string())
            .mime_str(content_type)
            .map_err(|e| MediaError::Rejected(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("folder", self.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.api_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected(format!("{}: {}", status, body)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        Ok(StoredObject {
            url: uploaded.url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(format!("{}/objects/{}", self.api_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Err(MediaError::NotFound(public_id.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(MediaError::Request(format!("{}: {}", status, body)))
            }
        }
    }
}

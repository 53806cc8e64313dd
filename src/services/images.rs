use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::media::ObjectStorage;
use crate::models::image::Image;
use crate::store::{Collection, DocumentStore};

/// Upload a gallery image and persist its object-store handle.
pub async fn upload(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    name: Option<String>,
    filename: String,
    content_type: String,
    data: Vec<u8>,
) -> Result<Image, ApiError> {
    let stored = storage.upload(&filename, &content_type, data).await?;

    let now = Utc::now();
    let image = Image {
        id: Uuid::new_v4(),
        name: name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Untitled Image".to_string()),
        image_url: stored.url,
        public_id: stored.public_id,
        created_at: now,
        updated_at: now,
    };

    Collection::<Image>::new(store).insert(&image).await?;
    Ok(image)
}

/// Newest first, the order the gallery renders in.
pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Image>, ApiError> {
    let mut images = Collection::<Image>::new(store).all().await?;
    images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(images)
}

pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<Image, ApiError> {
    Ok(Collection::<Image>::new(store).get_404(id).await?)
}

/// Rename and/or swap the stored file. A new file replaces the old object
/// (delete first), and the record's public id follows the new object.
pub async fn update(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    id: Uuid,
    name: Option<String>,
    file: Option<(String, String, Vec<u8>)>,
) -> Result<Image, ApiError> {
    let images = Collection::<Image>::new(store);
    let mut image = images.get_404(id).await?;

    if let Some((filename, content_type, data)) = file {
        let stored = storage
            .replace(&image.public_id, &filename, &content_type, data)
            .await?;
        image.image_url = stored.url;
        image.public_id = stored.public_id;
    }
    if let Some(name) = name {
        image.name = name;
    }
    image.updated_at = Utc::now();

    images.save(&image).await?;
    Ok(image)
}

/// Remove the remote object first, then the record.
pub async fn delete(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    id: Uuid,
) -> Result<(), ApiError> {
    let images = Collection::<Image>::new(store);
    let image = images.get_404(id).await?;

    storage.delete(&image.public_id).await?;
    images.delete(image.id).await?;
    Ok(())
}

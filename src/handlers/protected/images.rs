use axum::extract::{Multipart, Path, State};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::image::Image;
use crate::services::images;
use crate::AppState;

/// GET /api/images - Gallery listing, newest first
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Image>> {
    let list = images::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(list))
}

/// GET /api/images/:id
pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<Image> {
    let image = images::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(image))
}

/// POST /api/images (also mounted at /api/images/upload) - Multipart upload
/// with an optional display `name` field.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Image> {
    let (name, file) = read_named_upload(multipart).await?;
    let (filename, content_type, data) =
        file.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let image = images::upload(
        state.store.as_ref(),
        state.media.as_ref(),
        name,
        filename,
        content_type,
        data,
    )
    .await?;
    Ok(ApiResponse::created(image))
}

/// PUT /api/images/:id - Rename and/or replace the stored file
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Image> {
    let (name, file) = read_named_upload(multipart).await?;
    let image = images::update(state.store.as_ref(), state.media.as_ref(), id, name, file).await?;
    Ok(ApiResponse::success(image))
}

/// DELETE /api/images/:id - Removes the remote object, then the record
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    images::delete(state.store.as_ref(), state.media.as_ref(), id).await?;
    Ok(ApiResponse::message("Image deleted successfully"))
}

/// Pull the optional `name` text field and the file part from a multipart
/// body, whichever order they arrive in.
async fn read_named_upload(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<(String, String, Vec<u8>)>), ApiError> {
    let mut name = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("name") => {
                name = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read name field: {}", e))
                })?);
            }
            Some("file") | Some("image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?
                    .to_vec();
                file = Some((filename, content_type, data));
            }
            _ => {}
        }
    }

    Ok((name, file))
}

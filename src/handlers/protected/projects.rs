use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::project::{MediaItem, NewProject, ProjectUpdate, ProjectView};
use crate::services::projects;
use crate::AppState;

/// GET /api/projects - Active projects only
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ProjectView>> {
    let list = projects::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/projects
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProject>,
) -> ApiResult<ProjectView> {
    let project = projects::create(state.store.as_ref(), payload).await?;
    Ok(ApiResponse::created(project))
}

/// GET /api/projects/:id - Resolves archived projects too
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProjectView> {
    let project = projects::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(project))
}

/// PUT /api/projects/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> ApiResult<ProjectView> {
    let project = projects::update(state.store.as_ref(), id, payload).await?;
    Ok(ApiResponse::success(project))
}

/// DELETE /api/projects/:id - Permanent removal
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    projects::delete(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Project deleted successfully"))
}

/// PATCH /api/projects/:id/archive - Toggle the archive flag
pub async fn archive(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProjectView> {
    let project = projects::toggle_archive(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(project))
}

/// GET /api/projects/client/:clientId
pub async fn by_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> ApiResult<Vec<ProjectView>> {
    let list = projects::by_client(state.store.as_ref(), client_id).await?;
    Ok(ApiResponse::success(list))
}

/// GET /api/projects/staff/:userId
pub async fn by_staff(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Vec<ProjectView>> {
    let list = projects::by_staff(state.store.as_ref(), user_id).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/projects/:id/media - Attach an uploaded file
pub async fn media_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Vec<MediaItem>> {
    let upload = read_file_field(multipart).await?;
    let (filename, content_type, data) =
        upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let media = projects::add_media(
        state.store.as_ref(),
        state.media.as_ref(),
        id,
        filename,
        content_type,
        data,
    )
    .await?;
    Ok(ApiResponse::success(media))
}

/// DELETE /api/projects/:id/media/:mediaId
pub async fn media_delete(
    State(state): State<Arc<AppState>>,
    Path((id, media_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Vec<MediaItem>> {
    let media =
        projects::remove_media(state.store.as_ref(), state.media.as_ref(), id, media_id).await?;
    Ok(ApiResponse::success(media))
}

/// Pull the first `file` part out of a multipart body.
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<Option<(String, String, Vec<u8>)>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if matches!(field.name(), Some("file") | Some("image")) {
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
            return Ok(Some((filename, content_type, data)));
        }
    }
    Ok(None)
}

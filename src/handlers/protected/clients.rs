use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::client::{ClientUpdate, ClientView, NewClient};
use crate::services::clients;
use crate::AppState;

/// GET /api/clients
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ClientView>> {
    let list = clients::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/clients
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewClient>,
) -> ApiResult<ClientView> {
    let client = clients::create(state.store.as_ref(), payload).await?;
    Ok(ApiResponse::created(client))
}

/// GET /api/clients/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ClientView> {
    let client = clients::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(client))
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> ApiResult<ClientView> {
    let client = clients::update(state.store.as_ref(), id, payload).await?;
    Ok(ApiResponse::success(client))
}

/// DELETE /api/clients/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    clients::delete(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Client deleted successfully"))
}

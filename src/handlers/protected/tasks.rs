use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::task::{NewTask, TaskUpdate, TaskView};
use crate::services::tasks;
use crate::AppState;

/// GET /api/tasks
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TaskView>> {
    let list = tasks::list(state.store.as_ref()).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTask>,
) -> ApiResult<TaskView> {
    let task = tasks::create(state.store.as_ref(), payload).await?;
    Ok(ApiResponse::created(task))
}

/// GET /api/tasks/:id
pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<TaskView> {
    let task = tasks::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(task))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskUpdate>,
) -> ApiResult<TaskView> {
    let task = tasks::update(state.store.as_ref(), id, payload).await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    tasks::delete(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Task deleted successfully"))
}

/// GET /api/tasks/project/:projectId
pub async fn by_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Vec<TaskView>> {
    let list = tasks::by_project(state.store.as_ref(), project_id).await?;
    Ok(ApiResponse::success(list))
}

/// GET /api/tasks/user/:userId
pub async fn by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Vec<TaskView>> {
    let list = tasks::by_user(state.store.as_ref(), user_id).await?;
    Ok(ApiResponse::success(list))
}

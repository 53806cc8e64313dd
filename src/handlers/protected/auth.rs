use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::policy::{self, Action, Resource};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::user::{ChangePasswordRequest, ProfileUpdate, RoleUpdate, UserView};
use crate::services::users;
use crate::AppState;

/// GET /api/auth/me - Current account profile
pub async fn me_get(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<UserView> {
    let user = users::get_user(state.store.as_ref(), auth.id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/me - Partial profile update; password is re-hashed
pub async fn me_put(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<UserView> {
    let user = users::update_profile(state.store.as_ref(), auth.id, payload).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/auth/me - Remove the caller's own account
pub async fn me_delete(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Value> {
    users::delete_user(state.store.as_ref(), auth.id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

/// PUT /api/auth/me/change-password - Rotate the caller's password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Value> {
    users::change_password(state.store.as_ref(), auth.id, payload).await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

/// GET /api/auth - All accounts (admin)
pub async fn users_list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<UserView>> {
    policy::require(auth.role, Action::List, Resource::Users)?;
    let list = users::list_users(state.store.as_ref()).await?;
    Ok(ApiResponse::success(list))
}

/// GET /api/auth/:id - One account (admin)
pub async fn user_get(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserView> {
    policy::require(auth.role, Action::Get, Resource::Users)?;
    let user = users::get_user(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/:id/role - Reassign an account's role (admin)
pub async fn role_put(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleUpdate>,
) -> ApiResult<UserView> {
    policy::require(auth.role, Action::UpdateRole, Resource::Users)?;
    let user = users::update_role(state.store.as_ref(), id, payload.role).await?;
    tracing::info!(user = %id, role = %payload.role, "role updated");
    Ok(ApiResponse::success(user))
}

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::user::{LoginRequest, RegisterRequest, SessionResponse};
use crate::services::users;
use crate::AppState;

/// POST /api/auth/register - Create an account and open a session
///
/// Returns 201 with a bearer token and the new profile. Duplicate emails
/// and missing fields come back as validation errors.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    let user = users::register(state.store.as_ref(), payload).await?;
    let issued = state.tokens.issue(user.id, user.role)?;

    tracing::info!(user = %user.id, "registered new account");
    Ok(ApiResponse::created(SessionResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        user: user.into(),
    }))
}

/// POST /api/auth/login - Authenticate and receive a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let user = users::authenticate(state.store.as_ref(), payload).await?;
    let issued = state.tokens.issue(user.id, user.role)?;

    Ok(ApiResponse::success(SessionResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        user: user.into(),
    }))
}

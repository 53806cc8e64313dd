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
use crate::models::appointment::{AppointmentUpdate, AppointmentView, NewAppointment};
use crate::services::appointments;
use crate::AppState;

/// POST /api/appointments - Book for the acting account
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<NewAppointment>,
) -> ApiResult<AppointmentView> {
    let appointment = appointments::create(state.store.as_ref(), &auth, payload).await?;
    Ok(ApiResponse::created(appointment))
}

/// GET /api/appointments - Oversight listing (admin)
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<AppointmentView>> {
    policy::require(auth.role, Action::List, Resource::Appointments)?;
    let list = appointments::list(state.store.as_ref(), &auth).await?;
    Ok(ApiResponse::success(list))
}

/// GET /api/appointments/:id - Resolves archived bookings too
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    let appointment = appointments::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(appointment))
}

/// PUT /api/appointments/:id - Partial update, status moves included
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AppointmentUpdate>,
) -> ApiResult<AppointmentView> {
    let appointment = appointments::update(state.store.as_ref(), id, payload).await?;
    Ok(ApiResponse::success(appointment))
}

/// PUT /api/appointments/:id/archive - Hide from listings (admin)
pub async fn archive(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    policy::require(auth.role, Action::Archive, Resource::Appointments)?;
    let appointment = appointments::archive(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(appointment))
}

/// DELETE /api/appointments/:id - Permanent removal (admin)
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    policy::require(auth.role, Action::Delete, Resource::Appointments)?;
    appointments::delete(state.store.as_ref(), id).await?;
    Ok(ApiResponse::message("Appointment deleted successfully"))
}

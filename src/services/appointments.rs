use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::models::appointment::{
    Appointment, AppointmentUpdate, AppointmentView, NewAppointment,
};
use crate::store::{Collection, DocumentStore, StoreError};
use crate::types::Lifecycle;

use super::{user_summary, RequiredFields};

async fn into_view(
    store: &dyn DocumentStore,
    appointment: Appointment,
) -> Result<AppointmentView, StoreError> {
    Ok(AppointmentView {
        id: appointment.id,
        user: user_summary(store, appointment.user).await?,
        title: appointment.title,
        description: appointment.description,
        contact_number: appointment.contact_number,
        mode: appointment.mode,
        date: appointment.date,
        time_slot: appointment.time_slot,
        status: appointment.status,
        location: appointment.location,
        assigned_staff: appointment.assigned_staff,
        notes: appointment.notes,
        lifecycle: appointment.lifecycle,
        created_at: appointment.created_at,
        updated_at: appointment.updated_at,
    })
}

/// Book an appointment for the acting account. Overlapping slots for the
/// same date are accepted; double bookings are a staff-coordination matter.
pub async fn create(
    store: &dyn DocumentStore,
    auth: &AuthUser,
    req: NewAppointment,
) -> Result<AppointmentView, ApiError> {
    let mut required = RequiredFields::new();
    let date = required.take("date", req.date);
    let time_slot = required.take("timeSlot", req.time_slot);
    required.finish()?;

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        user: auth.id,
        title: req.title,
        description: req.description,
        contact_number: req.contact_number,
        mode: req.mode.unwrap_or_default(),
        date: date.unwrap(),
        time_slot: time_slot.unwrap(),
        status: req.status.unwrap_or_default(),
        location: req.location,
        assigned_staff: req.assigned_staff.unwrap_or_default(),
        notes: req
            .notes
            .unwrap_or_default()
            .into_iter()
            .map(|n| n.into_note(now))
            .collect(),
        lifecycle: Default::default(),
        created_at: now,
        updated_at: now,
    };

    Collection::<Appointment>::new(store)
        .insert(&appointment)
        .await?;
    Ok(into_view(store, appointment).await?)
}

/// Default listing: archived bookings are hidden, and non-admin callers see
/// only their own records.
pub async fn list(
    store: &dyn DocumentStore,
    auth: &AuthUser,
) -> Result<Vec<AppointmentView>, ApiError> {
    let appointments = Collection::<Appointment>::new(store).all().await?;
    let mut views = Vec::new();
    for appointment in appointments {
        if appointment.lifecycle.is_archived() {
            continue;
        }
        if !auth.role.is_admin() && appointment.user != auth.id {
            continue;
        }
        views.push(into_view(store, appointment).await?);
    }
    Ok(views)
}

/// Fetch by id. Archived bookings still resolve; only listings hide them.
pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<AppointmentView, ApiError> {
    let appointment = Collection::<Appointment>::new(store).get_404(id).await?;
    Ok(into_view(store, appointment).await?)
}

/// Apply a partial update. Status moves are unrestricted field writes;
/// archived bookings remain editable.
pub async fn update(
    store: &dyn DocumentStore,
    id: Uuid,
    update: AppointmentUpdate,
) -> Result<AppointmentView, ApiError> {
    let appointments = Collection::<Appointment>::new(store);
    let mut appointment = appointments.get_404(id).await?;
    let now = Utc::now();

    if let Some(title) = update.title {
        appointment.title = Some(title);
    }
    if let Some(description) = update.description {
        appointment.description = Some(description);
    }
    if let Some(contact_number) = update.contact_number {
        appointment.contact_number = Some(contact_number);
    }
    if let Some(mode) = update.mode {
        appointment.mode = mode;
    }
    if let Some(date) = update.date {
        appointment.date = date;
    }
    if let Some(time_slot) = update.time_slot {
        appointment.time_slot = time_slot;
    }
    if let Some(status) = update.status {
        appointment.status = status;
    }
    if let Some(location) = update.location {
        appointment.location = Some(location);
    }
    if let Some(assigned_staff) = update.assigned_staff {
        appointment.assigned_staff = assigned_staff;
    }
    if let Some(notes) = update.notes {
        appointment.notes = notes.into_iter().map(|n| n.into_note(now)).collect();
    }
    appointment.updated_at = now;

    appointments.save(&appointment).await?;
    Ok(into_view(store, appointment).await?)
}

/// One-way archive; the record keeps every other field and stays readable.
pub async fn archive(store: &dyn DocumentStore, id: Uuid) -> Result<AppointmentView, ApiError> {
    let appointments = Collection::<Appointment>::new(store);
    let mut appointment = appointments.get_404(id).await?;
    appointment.lifecycle = Lifecycle::Archived;
    appointment.updated_at = Utc::now();
    appointments.save(&appointment).await?;
    Ok(into_view(store, appointment).await?)
}

pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
    Collection::<Appointment>::new(store).delete(id).await?;
    Ok(())
}

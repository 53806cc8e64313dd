pub mod appointments;
pub mod clients;
pub mod images;
pub mod projects;
pub mod tasks;
pub mod users;

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::client::Client;
use crate::models::project::Project;
use crate::models::user::User;
use crate::models::{ClientSummary, ProjectSummary, UserSummary};
use crate::store::{Collection, DocumentStore, StoreError};

/// Collector for required-field validation. Missing fields are reported
/// together in one `ValidationError` with per-field messages.
pub(crate) struct RequiredFields {
    errors: HashMap<String, String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    pub fn take<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors
                .insert(field.to_string(), "This field is required".to_string());
        }
        value
    }

    pub fn take_string(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value.filter(|s| !s.trim().is_empty());
        self.take(field, value)
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(
                "Missing required fields",
                Some(self.errors),
            ))
        }
    }
}

// Reference population. Stored documents carry bare ids; API views carry
// display stubs. Dangling ids resolve to nothing rather than erroring.

pub(crate) async fn user_summary(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<UserSummary>, StoreError> {
    Ok(Collection::<User>::new(store).get(id).await?.map(|u| UserSummary {
        id: u.id,
        name: u.name,
        email: u.email,
    }))
}

pub(crate) async fn user_summaries(
    store: &dyn DocumentStore,
    ids: &[Uuid],
) -> Result<Vec<UserSummary>, StoreError> {
    let mut summaries = Vec::with_capacity(ids.len());
    for &id in ids {
        if let Some(summary) = user_summary(store, id).await? {
            summaries.push(summary);
        }
    }
    Ok(summaries)
}

pub(crate) async fn client_summary(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<ClientSummary>, StoreError> {
    Ok(Collection::<Client>::new(store).get(id).await?.map(|c| ClientSummary {
        id: c.id,
        name: c.name,
        email: c.email,
    }))
}

pub(crate) async fn project_summary(
    store: &dyn DocumentStore,
    id: Uuid,
) -> Result<Option<ProjectSummary>, StoreError> {
    Ok(Collection::<Project>::new(store).get(id).await?.map(|p| ProjectSummary {
        id: p.id,
        title: p.title,
    }))
}

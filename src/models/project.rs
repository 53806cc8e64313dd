use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientSummary, Location, Note, NoteInput, UserSummary};
use crate::store::Document;
use crate::types::Lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planned,
    Ongoing,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
    Cancelled,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Planned
    }
}

/// One uploaded file attached to a project. `public_id` is the handle the
/// object store knows the file by; it must track the remote object exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub content_type: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub client: Uuid,
    pub budget: Decimal,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Completion percentage, 0-100
    #[serde(default)]
    pub progress: u8,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub assigned_staff: Vec<Uuid>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client: Option<Uuid>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub assigned_staff: Option<Vec<Uuid>>,
    #[serde(default)]
    pub notes: Option<Vec<NoteInput>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client: Option<Uuid>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
    pub location: Option<Location>,
    pub assigned_staff: Option<Vec<Uuid>>,
    pub notes: Option<Vec<NoteInput>>,
}

/// Project with client and staff references resolved to display stubs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub client: Option<ClientSummary>,
    pub budget: Decimal,
    pub status: ProjectStatus,
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub location: Option<Location>,
    pub assigned_staff: Vec<UserSummary>,
    pub media: Vec<MediaItem>,
    pub notes: Vec<Note>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

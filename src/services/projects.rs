use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::media::{MediaError, ObjectStorage};
use crate::models::project::{MediaItem, NewProject, Project, ProjectUpdate, ProjectView};
use crate::store::{Collection, DocumentStore, StoreError};

use super::{client_summary, user_summaries, RequiredFields};

async fn into_view(store: &dyn DocumentStore, project: Project) -> Result<ProjectView, StoreError> {
    Ok(ProjectView {
        id: project.id,
        title: project.title,
        description: project.description,
        client: client_summary(store, project.client).await?,
        budget: project.budget,
        status: project.status,
        progress: project.progress,
        start_date: project.start_date,
        end_date: project.end_date,
        deadline: project.deadline,
        location: project.location,
        assigned_staff: user_summaries(store, &project.assigned_staff).await?,
        media: project.media,
        notes: project.notes,
        lifecycle: project.lifecycle,
        created_at: project.created_at,
        updated_at: project.updated_at,
    })
}

fn check_progress(progress: u8) -> Result<u8, ApiError> {
    if progress > 100 {
        return Err(ApiError::validation_error(
            "progress must be between 0 and 100",
            None,
        ));
    }
    Ok(progress)
}

pub async fn create(store: &dyn DocumentStore, req: NewProject) -> Result<ProjectView, ApiError> {
    let mut required = RequiredFields::new();
    let title = required.take_string("title", req.title);
    let description = required.take_string("description", req.description);
    let client = required.take("client", req.client);
    let budget = required.take("budget", req.budget);
    let start_date = required.take("startDate", req.start_date);
    required.finish()?;

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        title: title.unwrap(),
        description: description.unwrap(),
        client: client.unwrap(),
        budget: budget.unwrap(),
        status: req.status.unwrap_or_default(),
        progress: check_progress(req.progress.unwrap_or(0))?,
        start_date: start_date.unwrap(),
        end_date: req.end_date,
        deadline: req.deadline,
        location: req.location,
        assigned_staff: req.assigned_staff.unwrap_or_default(),
        media: vec![],
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

    Collection::<Project>::new(store).insert(&project).await?;
    Ok(into_view(store, project).await?)
}

/// Default listing: archived projects are hidden.
pub async fn list(store: &dyn DocumentStore) -> Result<Vec<ProjectView>, ApiError> {
    let projects = Collection::<Project>::new(store).all().await?;
    let mut views = Vec::new();
    for project in projects {
        if project.lifecycle.is_archived() {
            continue;
        }
        views.push(into_view(store, project).await?);
    }
    Ok(views)
}

/// Fetch by id. Archived projects still resolve; only listings hide them.
pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<ProjectView, ApiError> {
    let project = Collection::<Project>::new(store).get_404(id).await?;
    Ok(into_view(store, project).await?)
}

pub async fn update(
    store: &dyn DocumentStore,
    id: Uuid,
    update: ProjectUpdate,
) -> Result<ProjectView, ApiError> {
    let projects = Collection::<Project>::new(store);
    let mut project = projects.get_404(id).await?;
    let now = Utc::now();

    if let Some(title) = update.title {
        project.title = title;
    }
    if let Some(description) = update.description {
        project.description = description;
    }
    if let Some(client) = update.client {
        project.client = client;
    }
    if let Some(budget) = update.budget {
        project.budget = budget;
    }
    if let Some(start_date) = update.start_date {
        project.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        project.end_date = Some(end_date);
    }
    if let Some(deadline) = update.deadline {
        project.deadline = Some(deadline);
    }
    if let Some(status) = update.status {
        project.status = status;
    }
    if let Some(progress) = update.progress {
        project.progress = check_progress(progress)?;
    }
    if let Some(location) = update.location {
        project.location = Some(location);
    }
    if let Some(assigned_staff) = update.assigned_staff {
        project.assigned_staff = assigned_staff;
    }
    if let Some(notes) = update.notes {
        project.notes = notes.into_iter().map(|n| n.into_note(now)).collect();
    }
    project.updated_at = now;

    projects.save(&project).await?;
    Ok(into_view(store, project).await?)
}

pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
    Collection::<Project>::new(store).delete(id).await?;
    Ok(())
}

/// Flip the archive flag. Archiving does not cascade to the project's tasks.
pub async fn toggle_archive(store: &dyn DocumentStore, id: Uuid) -> Result<ProjectView, ApiError> {
    let projects = Collection::<Project>::new(store);
    let mut project = projects.get_404(id).await?;
    project.lifecycle = project.lifecycle.toggled();
    project.updated_at = Utc::now();
    projects.save(&project).await?;
    Ok(into_view(store, project).await?)
}

pub async fn by_client(
    store: &dyn DocumentStore,
    client_id: Uuid,
) -> Result<Vec<ProjectView>, ApiError> {
    let projects = Collection::<Project>::new(store)
        .find_eq("client", json!(client_id))
        .await?;
    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(into_view(store, project).await?);
    }
    Ok(views)
}

pub async fn by_staff(
    store: &dyn DocumentStore,
    user_id: Uuid,
) -> Result<Vec<ProjectView>, ApiError> {
    let projects = Collection::<Project>::new(store)
        .find_eq("assignedStaff", json!(user_id))
        .await?;
    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(into_view(store, project).await?);
    }
    Ok(views)
}

/// Upload a file to the object store and attach it to the project.
pub async fn add_media(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    id: Uuid,
    name: String,
    content_type: String,
    data: Vec<u8>,
) -> Result<Vec<MediaItem>, ApiError> {
    let projects = Collection::<Project>::new(store);
    let mut project = projects.get_404(id).await?;

    let stored = storage.upload(&name, &content_type, data).await?;
    project.media.push(MediaItem {
        id: Uuid::new_v4(),
        name,
        url: stored.url,
        content_type,
        public_id: stored.public_id,
    });
    project.updated_at = Utc::now();

    projects.save(&project).await?;
    Ok(project.media)
}

/// Detach one media item and delete its object. A remote object that is
/// already gone still gets detached; ids must not point at dead objects.
pub async fn remove_media(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    id: Uuid,
    media_id: Uuid,
) -> Result<Vec<MediaItem>, ApiError> {
    let projects = Collection::<Project>::new(store);
    let mut project = projects.get_404(id).await?;

    let position = project
        .media
        .iter()
        .position(|item| item.id == media_id)
        .ok_or_else(|| ApiError::not_found("Media not found"))?;
    let item = project.media.remove(position);

    match storage.delete(&item.public_id).await {
        Ok(()) | Err(MediaError::NotFound(_)) => {}
        Err(other) => return Err(other.into()),
    }

    project.updated_at = Utc::now();
    projects.save(&project).await?;
    Ok(project.media)
}

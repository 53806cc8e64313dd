use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::task::{NewTask, Task, TaskUpdate, TaskView};
use crate::store::{Collection, DocumentStore, StoreError};

use super::{project_summary, user_summary, RequiredFields};

async fn into_view(store: &dyn DocumentStore, task: Task) -> Result<TaskView, StoreError> {
    let assigned_to = match task.assigned_to {
        Some(id) => user_summary(store, id).await?,
        None => None,
    };
    let project = match task.project {
        Some(id) => project_summary(store, id).await?,
        None => None,
    };
    Ok(TaskView {
        id: task.id,
        title: task.title,
        description: task.description,
        assigned_to,
        project,
        status: task.status,
        priority: task.priority,
        deadline: task.deadline,
        created_at: task.created_at,
        updated_at: task.updated_at,
    })
}

pub async fn create(store: &dyn DocumentStore, req: NewTask) -> Result<TaskView, ApiError> {
    let mut required = RequiredFields::new();
    let title = required.take_string("title", req.title);
    required.finish()?;

    let now = Utc::now();
    let task = Task {
        id: Uuid::new_v4(),
        title: title.unwrap(),
        description: req.description,
        assigned_to: req.assigned_to,
        project: req.project,
        status: req.status.unwrap_or_default(),
        priority: req.priority.unwrap_or_default(),
        deadline: req.deadline,
        created_at: now,
        updated_at: now,
    };

    Collection::<Task>::new(store).insert(&task).await?;
    Ok(into_view(store, task).await?)
}

pub async fn list(store: &dyn DocumentStore) -> Result<Vec<TaskView>, ApiError> {
    let tasks = Collection::<Task>::new(store).all().await?;
    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        views.push(into_view(store, task).await?);
    }
    Ok(views)
}

pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<TaskView, ApiError> {
    let task = Collection::<Task>::new(store).get_404(id).await?;
    Ok(into_view(store, task).await?)
}

pub async fn update(
    store: &dyn DocumentStore,
    id: Uuid,
    update: TaskUpdate,
) -> Result<TaskView, ApiError> {
    let tasks = Collection::<Task>::new(store);
    let mut task = tasks.get_404(id).await?;

    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = Some(description);
    }
    if let Some(assigned_to) = update.assigned_to {
        task.assigned_to = Some(assigned_to);
    }
    if let Some(project) = update.project {
        task.project = Some(project);
    }
    if let Some(status) = update.status {
        task.status = status;
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    if let Some(deadline) = update.deadline {
        task.deadline = Some(deadline);
    }
    task.updated_at = Utc::now();

    tasks.save(&task).await?;
    Ok(into_view(store, task).await?)
}

pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
    Collection::<Task>::new(store).delete(id).await?;
    Ok(())
}

pub async fn by_project(
    store: &dyn DocumentStore,
    project_id: Uuid,
) -> Result<Vec<TaskView>, ApiError> {
    let tasks = Collection::<Task>::new(store)
        .find_eq("project", json!(project_id))
        .await?;
    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        views.push(into_view(store, task).await?);
    }
    Ok(views)
}

pub async fn by_user(store: &dyn DocumentStore, user_id: Uuid) -> Result<Vec<TaskView>, ApiError> {
    let tasks = Collection::<Task>::new(store)
        .find_eq("assignedTo", json!(user_id))
        .await?;
    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        views.push(into_view(store, task).await?);
    }
    Ok(views)
}

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::client::{Client, ClientUpdate, ClientView, NewClient};
use crate::store::{Collection, DocumentStore, StoreError};

use super::{project_summary, RequiredFields};

async fn into_view(store: &dyn DocumentStore, client: Client) -> Result<ClientView, StoreError> {
    let mut projects = Vec::with_capacity(client.projects.len());
    for id in &client.projects {
        if let Some(summary) = project_summary(store, *id).await? {
            projects.push(summary);
        }
    }
    Ok(ClientView {
        id: client.id,
        name: client.name,
        email: client.email,
        company: client.company,
        phone: client.phone,
        address: client.address,
        projects,
        created_at: client.created_at,
        updated_at: client.updated_at,
    })
}

/// Create a client. Email must be unique across clients.
pub async fn create(store: &dyn DocumentStore, req: NewClient) -> Result<ClientView, ApiError> {
    let mut required = RequiredFields::new();
    let name = required.take_string("name", req.name);
    let email = required.take_string("email", req.email);
    required.finish()?;

    let (name, email) = (name.unwrap(), email.unwrap());

    let clients = Collection::<Client>::new(store);
    if !clients.find_eq("email", json!(email)).await?.is_empty() {
        return Err(ApiError::validation_error(
            "Client with this email already exists",
            None,
        ));
    }

    let now = Utc::now();
    let client = Client {
        id: Uuid::new_v4(),
        name,
        email,
        company: req.company,
        phone: req.phone,
        address: req.address,
        projects: req.projects.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    clients.insert(&client).await?;
    Ok(into_view(store, client).await?)
}

pub async fn list(store: &dyn DocumentStore) -> Result<Vec<ClientView>, ApiError> {
    let clients = Collection::<Client>::new(store).all().await?;
    let mut views = Vec::with_capacity(clients.len());
    for client in clients {
        views.push(into_view(store, client).await?);
    }
    Ok(views)
}

pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<ClientView, ApiError> {
    let client = Collection::<Client>::new(store).get_404(id).await?;
    Ok(into_view(store, client).await?)
}

pub async fn update(
    store: &dyn DocumentStore,
    id: Uuid,
    update: ClientUpdate,
) -> Result<ClientView, ApiError> {
    let clients = Collection::<Client>::new(store);
    let mut client = clients.get_404(id).await?;

    if let Some(name) = update.name {
        client.name = name;
    }
    if let Some(email) = update.email {
        client.email = email;
    }
    if let Some(company) = update.company {
        client.company = Some(company);
    }
    if let Some(phone) = update.phone {
        client.phone = Some(phone);
    }
    if let Some(address) = update.address {
        client.address = Some(address);
    }
    if let Some(projects) = update.projects {
        client.projects = projects;
    }
    client.updated_at = Utc::now();

    clients.save(&client).await?;
    Ok(into_view(store, client).await?)
}

pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
    Collection::<Client>::new(store).delete(id).await?;
    Ok(())
}

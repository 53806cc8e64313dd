use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest, User, UserView,
};
use crate::store::{Collection, DocumentStore};
use crate::types::Role;

use super::RequiredFields;

/// Create an account. Email must be unique across users.
pub async fn register(store: &dyn DocumentStore, req: RegisterRequest) -> Result<User, ApiError> {
    let mut required = RequiredFields::new();
    let name = required.take_string("name", req.name);
    let email = required.take_string("email", req.email);
    let password = required.take_string("password", req.password);
    required.finish()?;

    let (name, email, password) = (name.unwrap(), email.unwrap(), password.unwrap());

    let users = Collection::<User>::new(store);
    if !users.find_eq("email", json!(email)).await?.is_empty() {
        return Err(ApiError::validation_error(
            "A user with this email already exists",
            None,
        ));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash: hash_password(&password)?,
        role: req.role.unwrap_or_default(),
        contact: req.contact,
        address: req.address,
        created_at: now,
        updated_at: now,
    };

    users.insert(&user).await?;
    Ok(user)
}

/// Validate credentials for login. The failure message never says which
/// half was wrong.
pub async fn authenticate(store: &dyn DocumentStore, req: LoginRequest) -> Result<User, ApiError> {
    let users = Collection::<User>::new(store);
    let user = users
        .find_eq("email", json!(req.email))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(user)
}

pub async fn get_user(store: &dyn DocumentStore, id: Uuid) -> Result<UserView, ApiError> {
    let user = Collection::<User>::new(store).get_404(id).await?;
    Ok(user.into())
}

pub async fn list_users(store: &dyn DocumentStore) -> Result<Vec<UserView>, ApiError> {
    let users = Collection::<User>::new(store).all().await?;
    Ok(users.into_iter().map(UserView::from).collect())
}

/// Partial self-profile update; a submitted password is re-hashed.
pub async fn update_profile(
    store: &dyn DocumentStore,
    id: Uuid,
    update: ProfileUpdate,
) -> Result<UserView, ApiError> {
    let users = Collection::<User>::new(store);
    let mut user = users.get_404(id).await?;

    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(email) = update.email {
        user.email = email;
    }
    if let Some(password) = update.password {
        user.password_hash = hash_password(&password)?;
    }
    if let Some(contact) = update.contact {
        user.contact = Some(contact);
    }
    if let Some(address) = update.address {
        user.address = Some(address);
    }
    user.updated_at = Utc::now();

    users.save(&user).await?;
    Ok(user.into())
}

pub async fn change_password(
    store: &dyn DocumentStore,
    id: Uuid,
    req: ChangePasswordRequest,
) -> Result<(), ApiError> {
    let users = Collection::<User>::new(store);
    let mut user = users.get_404(id).await?;

    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    user.password_hash = hash_password(&req.new_password)?;
    user.updated_at = Utc::now();
    users.save(&user).await?;
    Ok(())
}

/// Admin operation: change another account's role.
pub async fn update_role(
    store: &dyn DocumentStore,
    id: Uuid,
    role: Role,
) -> Result<UserView, ApiError> {
    let users = Collection::<User>::new(store);
    let mut user = users.get_404(id).await?;
    user.role = role;
    user.updated_at = Utc::now();
    users.save(&user).await?;
    Ok(user.into())
}

pub async fn delete_user(store: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
    Collection::<User>::new(store).delete(id).await?;
    Ok(())
}

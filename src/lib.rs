pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod types;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::media::{HttpObjectStorage, MemoryObjectStorage, ObjectStorage};
use crate::store::{DocumentStore, MemoryStore, PgStore};

/// Shared application state handed to every handler: the document store,
/// the object-storage client, and the session token service.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub media: Arc<dyn ObjectStorage>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, media: Arc<dyn ObjectStorage>) -> Self {
        Self {
            store,
            media,
            tokens: TokenService::from_config(&config::config().security),
        }
    }

    /// Fully in-process state: memory store and memory object storage.
    /// Used by the test suite and by dev runs without external services.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryObjectStorage::new()),
        )
    }

    /// Pick backends from the environment: Postgres when DATABASE_URL is
    /// set, the hosted object store when MEDIA_API_URL is set, in-memory
    /// fallbacks otherwise.
    pub async fn from_env() -> anyhow::Result<Self> {
        let config = config::config();

        let store: Arc<dyn DocumentStore> = if std::env::var("DATABASE_URL").is_ok() {
            Arc::new(PgStore::connect(&config.database).await?)
        } else {
            tracing::info!("DATABASE_URL not set, using in-memory document store");
            Arc::new(MemoryStore::new())
        };

        let media: Arc<dyn ObjectStorage> = if std::env::var("MEDIA_API_URL").is_ok() {
            Arc::new(HttpObjectStorage::from_config(&config.media))
        } else {
            tracing::info!("MEDIA_API_URL not set, using in-memory object storage");
            Arc::new(MemoryObjectStorage::new())
        };

        Ok(Self::new(store, media))
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .route("/api/auth/register", post(handlers::public::auth::register))
        .route("/api/auth/login", post(handlers::public::auth::login));

    let protected = Router::new()
        .merge(auth_routes())
        .merge(client_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(appointment_routes())
        .merge(image_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::bearer_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<Arc<AppState>> {
    use handlers::protected::auth;

    Router::new()
        // Self-profile operations
        .route(
            "/api/auth/me",
            get(auth::me_get).put(auth::me_put).delete(auth::me_delete),
        )
        .route("/api/auth/me/change-password", put(auth::change_password))
        // Admin user management
        .route("/api/auth", get(auth::users_list))
        .route("/api/auth/:id", get(auth::user_get))
        .route("/api/auth/:id/role", put(auth::role_put))
}

fn client_routes() -> Router<Arc<AppState>> {
    use handlers::protected::clients;

    Router::new()
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/:id",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
}

fn project_routes() -> Router<Arc<AppState>> {
    use handlers::protected::projects;

    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/:id",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/api/projects/:id/archive", patch(projects::archive))
        // Filtered listings
        .route("/api/projects/client/:client_id", get(projects::by_client))
        .route("/api/projects/staff/:user_id", get(projects::by_staff))
        // Project media
        .route("/api/projects/:id/media", post(projects::media_post))
        .route(
            "/api/projects/:id/media/:media_id",
            axum::routing::delete(projects::media_delete),
        )
}

fn task_routes() -> Router<Arc<AppState>> {
    use handlers::protected::tasks;

    Router::new()
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        // Filtered listings
        .route("/api/tasks/project/:project_id", get(tasks::by_project))
        .route("/api/tasks/user/:user_id", get(tasks::by_user))
}

fn appointment_routes() -> Router<Arc<AppState>> {
    use handlers::protected::appointments;

    Router::new()
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route(
            "/api/appointments/:id",
            get(appointments::get)
                .put(appointments::update)
                .delete(appointments::delete),
        )
        .route("/api/appointments/:id/archive", put(appointments::archive))
}

fn image_routes() -> Router<Arc<AppState>> {
    use handlers::protected::images;

    Router::new()
        .route("/api/images", get(images::list).post(images::upload))
        // The admin console posts gallery uploads here
        .route("/api/images/upload", post(images::upload))
        .route(
            "/api/images/:id",
            get(images::get).put(images::update).delete(images::delete),
        )
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Stonebridge API",
            "version": version,
            "description": "Back-office REST API for Stonebridge Construction",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/register, /api/auth/login (public), /api/auth/* (protected)",
                "clients": "/api/clients[/:id] (protected)",
                "projects": "/api/projects[/:id] (protected)",
                "tasks": "/api/tasks[/:id] (protected)",
                "appointments": "/api/appointments[/:id] (protected)",
                "images": "/api/images[/:id] (protected)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "message": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}

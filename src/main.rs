use std::sync::Arc;

use stonebridge_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Stonebridge API in {:?} mode", config.environment);

    let state = AppState::from_env()
        .await
        .unwrap_or_else(|e| panic!("failed to initialize application state: {}", e));

    let app = app(Arc::new(state));

    // Allow tests or deployments to override port via env
    let port = std::env::var("STONEBRIDGE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Stonebridge API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use serde_json::{json, Value};

pub struct TestServer {
    pub base_url: String,
}

/// Spawn a fresh in-process server on an unused port, backed by the
/// in-memory store so every test starts from empty collections.
pub async fn spawn() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let state = Arc::new(stonebridge_api::AppState::in_memory());
    let app = stonebridge_api::app(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    Ok(TestServer { base_url })
}

/// Register an account and return its bearer token plus the user object.
pub async fn register(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<(String, Value)> {
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role,
        }))
        .send()
        .await?;
    ensure!(
        res.status() == reqwest::StatusCode::CREATED,
        "register failed with status {}",
        res.status()
    );

    let body: Value = res.json().await?;
    let token = body["data"]["token"]
        .as_str()
        .context("missing token in register response")?
        .to_string();
    Ok((token, body["data"]["user"].clone()))
}

/// Shortcut: an admin session for gated endpoints.
pub async fn admin_session(client: &reqwest::Client, base_url: &str) -> Result<String> {
    let (token, _) = register(
        client,
        base_url,
        "Site Admin",
        "admin@stonebridge.example",
        "admin-pass-1",
        "admin",
    )
    .await?;
    Ok(token)
}

/// Shortcut: a non-admin client session.
pub async fn client_session(client: &reqwest::Client, base_url: &str) -> Result<(String, Value)> {
    register(
        client,
        base_url,
        "Jordan Client",
        "jordan@client.example",
        "client-pass-1",
        "Client",
    )
    .await
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_applies_defaults_and_round_trips() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Order rebar",
            "description": "20 tonnes, grade 60",
            "deadline": "2024-03-15",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let task = &body["data"];
    assert_eq!(task["status"], "Not Started");
    assert_eq!(task["priority"], "Medium");
    let id = task["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Order rebar");
    assert_eq!(body["data"]["description"], "20 tonnes, grade 60");
    assert_eq!(body["data"]["deadline"], "2024-03-15");
    Ok(())
}

#[tokio::test]
async fn title_is_required() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"priority": "High"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["title"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn populates_assignee_and_project_stubs() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let (_, worker) = common::register(
        &client,
        &server.base_url,
        "Wes Worker",
        "wes@stonebridge.example",
        "worker-pass-1",
        "Worker",
    )
    .await?;
    let worker_id = worker["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/api/clients", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"name": "Acme", "email": "office@acme.example"}))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let client_id = body["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Roof",
            "description": "Warehouse roof replacement",
            "client": client_id,
            "budget": 5000,
            "startDate": "2024-01-01",
        }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Strip old membrane",
            "assignedTo": worker_id,
            "project": project_id,
            "priority": "High",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["assignedTo"]["name"], "Wes Worker");
    assert_eq!(body["data"]["assignedTo"]["email"], "wes@stonebridge.example");
    assert_eq!(body["data"]["project"]["title"], "Roof");

    // filtered listings
    let res = client
        .get(format!(
            "{}/api/tasks/project/{}",
            server.base_url, project_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/api/tasks/user/{}", server.base_url, worker_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn partial_update_retains_other_fields() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "Order rebar", "priority": "High"}))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({"status": "In Progress"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "In Progress");
    assert_eq!(body["data"]["title"], "Order rebar");
    assert_eq!(body["data"]["priority"], "High");
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/api/tasks", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "Order rebar"}))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/tasks/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

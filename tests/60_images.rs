mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

fn jpeg_part(bytes: Vec<u8>, filename: &str) -> Result<reqwest::multipart::Part> {
    Ok(reqwest::multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str("image/jpeg")?)
}

async fn upload(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: Option<&str>,
) -> Result<Value> {
    let mut form =
        reqwest::multipart::Form::new().part("file", jpeg_part(vec![0xFF, 0xD8, 0xFF], "raw.jpg")?);
    if let Some(name) = name {
        form = form.text("name", name.to_string());
    }

    let res = client
        .post(format!("{}/api/images/upload", base_url))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "upload failed: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
async fn upload_then_list_newest_first() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let first = upload(&client, &server.base_url, &token, Some("Foundation pour")).await?;
    assert_eq!(first["name"], "Foundation pour");
    assert!(first["imageUrl"].as_str().is_some());
    assert!(first["publicId"].as_str().is_some());

    upload(&client, &server.base_url, &token, Some("Framing day")).await?;

    let res = client
        .get(format!("{}/api/images", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Framing day");
    assert_eq!(listed[1]["name"], "Foundation pour");
    Ok(())
}

#[tokio::test]
async fn missing_name_defaults_to_untitled() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let image = upload(&client, &server.base_url, &token, None).await?;
    assert_eq!(image["name"], "Untitled Image");
    Ok(())
}

#[tokio::test]
async fn upload_without_a_file_is_rejected() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let form = reqwest::multipart::Form::new().text("name", "No file here");
    let res = client
        .post(format!("{}/api/images/upload", server.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn rename_keeps_the_stored_object() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let image = upload(&client, &server.base_url, &token, Some("Old name")).await?;
    let id = image["id"].as_str().unwrap();

    let form = reqwest::multipart::Form::new().text("name", "New name");
    let res = client
        .put(format!("{}/api/images/{}", server.base_url, id))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["name"], "New name");
    assert_eq!(body["data"]["publicId"], image["publicId"]);
    Ok(())
}

#[tokio::test]
async fn replacing_the_file_issues_a_new_public_id() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let image = upload(&client, &server.base_url, &token, Some("Site photo")).await?;
    let id = image["id"].as_str().unwrap();

    let form = reqwest::multipart::Form::new()
        .part("file", jpeg_part(vec![0xFF, 0xD8, 0xFE], "retake.jpg")?);
    let res = client
        .put(format!("{}/api/images/{}", server.base_url, id))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_ne!(body["data"]["publicId"], image["publicId"]);
    assert_ne!(body["data"]["imageUrl"], image["imageUrl"]);
    // name untouched by a file-only update
    assert_eq!(body["data"]["name"], "Site photo");
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let token = common::admin_session(&client, &server.base_url).await?;

    let image = upload(&client, &server.base_url, &token, Some("Temp")).await?;
    let id = image["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/images/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/images/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

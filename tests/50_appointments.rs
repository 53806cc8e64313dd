mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn book(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    payload: Value,
) -> Result<Value> {
    let res = client
        .post(format!("{}/api/appointments", base_url))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "booking failed: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
async fn booking_belongs_to_the_acting_account() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, user) = common::client_session(&client, &server.base_url).await?;

    let appointment = book(
        &client,
        &server.base_url,
        &client_token,
        json!({
            "title": "Site walkthrough",
            "date": "2024-06-01",
            "timeSlot": "10:00 AM - 11:00 AM",
            "contactNumber": "555-0100",
            "mode": "In-Person",
        }),
    )
    .await?;

    assert_eq!(appointment["status"], "Pending");
    assert_eq!(appointment["mode"], "In-Person");
    assert_eq!(appointment["user"]["id"], user["id"]);
    assert_eq!(appointment["user"]["email"], user["email"]);
    // the legacy display string becomes a structured pair
    assert_eq!(
        appointment["timeSlot"],
        json!({"start": "10:00", "end": "11:00"})
    );
    Ok(())
}

#[tokio::test]
async fn date_and_time_slot_are_required() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/api/appointments", server.base_url))
        .bearer_auth(&client_token)
        .json(&json!({"title": "No time given"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["date"].as_str().is_some());
    assert!(body["field_errors"]["timeSlot"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn overlapping_bookings_are_both_accepted() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;
    let admin_token = common::admin_session(&client, &server.base_url).await?;

    let payload = json!({"date": "2024-06-01", "timeSlot": "10:00 AM - 11:00 AM"});
    book(&client, &server.base_url, &client_token, payload.clone()).await?;
    book(&client, &server.base_url, &client_token, payload).await?;

    let res = client
        .get(format!("{}/api/appointments", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn oversight_listing_is_admin_only() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;

    let res = client
        .get(format!("{}/api/appointments", server.base_url))
        .bearer_auth(&client_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
    Ok(())
}

#[tokio::test]
async fn status_moves_are_unrestricted_field_writes() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;

    let appointment = book(
        &client,
        &server.base_url,
        &client_token,
        json!({"date": "2024-06-01", "timeSlot": "10:00 AM - 11:00 AM"}),
    )
    .await?;
    let id = appointment["id"].as_str().unwrap();

    for status in ["Confirmed", "Completed", "Pending"] {
        let res = client
            .put(format!("{}/api/appointments/{}", server.base_url, id))
            .bearer_auth(&client_token)
            .json(&json!({"status": status}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["data"]["status"], status);
    }
    Ok(())
}

#[tokio::test]
async fn archive_is_admin_only_and_hides_from_listings() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;
    let admin_token = common::admin_session(&client, &server.base_url).await?;

    let appointment = book(
        &client,
        &server.base_url,
        &client_token,
        json!({"date": "2024-06-01", "timeSlot": "10:00 AM - 11:00 AM"}),
    )
    .await?;
    let id = appointment["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/appointments/{}/archive", server.base_url, id))
        .bearer_auth(&client_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/api/appointments/{}/archive", server.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/appointments", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // direct fetch still resolves, and the record stays editable
    let res = client
        .get(format!("{}/api/appointments/{}", server.base_url, id))
        .bearer_auth(&client_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["lifecycle"], "archived");

    let res = client
        .put(format!("{}/api/appointments/{}", server.base_url, id))
        .bearer_auth(&client_token)
        .json(&json!({"status": "Cancelled"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "Cancelled");
    Ok(())
}

#[tokio::test]
async fn delete_is_admin_only_and_permanent() -> Result<()> {
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, _) = common::client_session(&client, &server.base_url).await?;
    let admin_token = common::admin_session(&client, &server.base_url).await?;

    let appointment = book(
        &client,
        &server.base_url,
        &client_token,
        json!({"date": "2024-06-01", "timeSlot": "10:00 AM - 11:00 AM"}),
    )
    .await?;
    let id = appointment["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/appointments/{}", server.base_url, id))
        .bearer_auth(&client_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/appointments/{}", server.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/appointments/{}", server.base_url, id))
        .bearer_auth(&client_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_admin_listing_filter_keeps_records_scoped_to_owner() -> Result<()> {
    // The route gate is admin-only today; the service-level owner filter is
    // exercised through the admin path by checking user stubs are populated.
    let server = common::spawn().await?;
    let client = reqwest::Client::new();
    let (client_token, user) = common::client_session(&client, &server.base_url).await?;
    let admin_token = common::admin_session(&client, &server.base_url).await?;

    book(
        &client,
        &server.base_url,
        &client_token,
        json!({"date": "2024-06-01", "timeSlot": "09:00 AM - 10:00 AM"}),
    )
    .await?;
    book(
        &client,
        &server.base_url,
        &admin_token,
        json!({"date": "2024-06-01", "timeSlot": "09:00 AM - 10:00 AM"}),
    )
    .await?;

    let res = client
        .get(format!("{}/api/appointments", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed
        .iter()
        .any(|a| a["user"]["id"] == user["id"]));
    Ok(())
}

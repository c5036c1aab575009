//! API integration tests
//!
//! These run against a live server with a migrated database.
//! Run with: cargo test --test api_tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080/api/v1".to_string())
}

/// Helper to get an administrator token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", base_url(), path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &Client, token: &str, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", base_url(), path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn put_json(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .put(format!("{}{}", base_url(), path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Short suffix keeping names and plates unique between runs
fn unique_suffix() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{:09}", nanos)
}

/// Client, equipment with `stock` units and a planned event with one line
/// of `quantity` units. Returns (event_id, equipment_id, material_id).
async fn planned_event(client: &Client, token: &str, stock: i32, quantity: i32) -> (i64, i64, i64) {
    let (_, client_body) = post_json(
        client,
        token,
        "/clients",
        json!({ "company": format!("Client {}", unique_suffix()), "representative": "Alex" }),
    )
    .await;
    let (_, equipment) = post_json(
        client,
        token,
        "/equipment",
        json!({ "model": format!("Par 64 {}", unique_suffix()), "quantity_in_stock": stock }),
    )
    .await;
    let equipment_id = equipment["id"].as_i64().expect("equipment id");
    let (_, event) = post_json(
        client,
        token,
        "/events",
        json!({
            "client_id": client_body["id"],
            "name": format!("Show {}", unique_suffix()),
            "start_date": "2030-09-01",
            "end_date": "2030-09-03"
        }),
    )
    .await;
    let event_id = event["id"].as_i64().expect("event id");
    let (_, material) = post_json(
        client,
        token,
        &format!("/events/{}/materials", event_id),
        json!({ "equipment_id": equipment_id, "quantity": quantity }),
    )
    .await;
    let material_id = material["id"].as_i64().expect("material id");
    (event_id, equipment_id, material_id)
}

/// Submit, review every line and approve
async fn approved_event(client: &Client, token: &str, event_id: i64, material_ids: &[i64]) {
    post_json(client, token, &format!("/events/{}/submit-for-review", event_id), json!({})).await;
    for material_id in material_ids {
        post_json(
            client,
            token,
            &format!("/events/{}/materials/{}/review", event_id, material_id),
            json!({}),
        )
        .await;
    }
    let (status, event) =
        post_json(client, token, &format!("/events/{}/approve", event_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "AWAITING_DEPARTURE");
}

async fn stock_of(client: &Client, token: &str, equipment_id: i64) -> (i64, i64) {
    let (_, equipment) = get_json(client, token, &format!("/equipment/{}", equipment_id)).await;
    (
        equipment["quantity_in_stock"].as_i64().expect("stock"),
        equipment["quantity_in_maintenance"].as_i64().expect("maintenance"),
    )
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_with_wrong_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "login": "admin",
            "password": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/events", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_equipment_categories() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let (status, body) = get_json(&client, &token, "/equipment/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .expect("categories should be an array")
        .iter()
        .any(|c| c["value"] == "MOVING_LIGHTS"));
}

#[tokio::test]
#[ignore]
async fn test_cancel_requires_reason_and_password() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let (_, client_body) = post_json(
        &client,
        &token,
        "/clients",
        json!({ "company": "Cancel Test Ltd", "representative": "Jo" }),
    )
    .await;
    let (_, event) = post_json(
        &client,
        &token,
        "/events",
        json!({
            "client_id": client_body["id"],
            "name": "Cancelled show",
            "start_date": "2030-03-01"
        }),
    )
    .await;
    let event_id = event["id"].as_i64().expect("event id");

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/cancel", event_id),
        json!({ "reason": "Client gave up" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &client,
        &token,
        &format!("/events/{}/cancel", event_id),
        json!({ "reason": "Client gave up", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");
}

#[tokio::test]
#[ignore]
async fn test_full_event_workflow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Registries
    let (status, client_body) = post_json(
        &client,
        &token,
        "/clients",
        json!({ "company": "Workflow Productions", "representative": "Sam" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, equipment) = post_json(
        &client,
        &token,
        "/equipment",
        json!({
            "model": "Spot 575",
            "manufacturer": "Acme",
            "category": "MOVING_LIGHTS",
            "quantity_in_stock": 10
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let equipment_id = equipment["id"].as_i64().expect("equipment id");

    // Planning
    let (status, event) = post_json(
        &client,
        &token,
        "/events",
        json!({
            "client_id": client_body["id"],
            "name": "Summer Gala",
            "start_date": "2030-06-01",
            "end_date": "2030-06-02"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["status"], "PLANNING");
    let event_id = event["id"].as_i64().expect("event id");

    let (status, material) = post_json(
        &client,
        &token,
        &format!("/events/{}/materials", event_id),
        json!({ "equipment_id": equipment_id, "quantity": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(material["supply_status"], "SUFFICIENT");
    let material_id = material["id"].as_i64().expect("material id");

    // Review
    let (status, event) = post_json(
        &client,
        &token,
        &format!("/events/{}/submit-for-review", event_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "AWAITING_REVIEW");

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/approve", event_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/materials/{}/review", event_id, material_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, event) = post_json(
        &client,
        &token,
        &format!("/events/{}/approve", event_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "AWAITING_DEPARTURE");

    // Departure takes stock out
    let (status, event) = post_json(
        &client,
        &token,
        &format!("/events/{}/departure", event_id),
        json!({ "items": [{ "material_id": material_id, "quantity": 4 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "IN_PROGRESS");

    let (_, equipment) = get_json(&client, &token, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["quantity_in_stock"], 6);

    // Return with one broken unit
    let (status, event) = post_json(
        &client,
        &token,
        &format!("/events/{}/return", event_id),
        json!({
            "items": [
                { "material_id": material_id, "quantity": 3, "condition": "GOOD" },
                { "material_id": material_id, "quantity": 1, "condition": "BROKEN", "note": "Lens cracked" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "FINISHED");

    let (_, equipment) = get_json(&client, &token, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["quantity_in_stock"], 9);
    assert_eq!(equipment["quantity_in_maintenance"], 1);

    // Damage report is available once something came back damaged
    let response = client
        .get(format!("{}/events/{}/damage-report", base_url(), event_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap_or_default(),
        "application/pdf"
    );
}

#[tokio::test]
#[ignore]
async fn test_failed_approval_keeps_awaiting_review() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, _, _) = planned_event(&client, &token, 10, 2).await;

    post_json(&client, &token, &format!("/events/{}/submit-for-review", event_id), json!({})).await;
    let (status, _) =
        post_json(&client, &token, &format!("/events/{}/approve", event_id), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, details) = get_json(&client, &token, &format!("/events/{}", event_id)).await;
    assert_eq!(details["status"], "AWAITING_REVIEW");
}

#[tokio::test]
#[ignore]
async fn test_return_for_correction_resets_review() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, _, material_id) = planned_event(&client, &token, 10, 2).await;
    let (_, second) = post_json(
        &client,
        &token,
        &format!("/events/{}/materials", event_id),
        json!({ "description": "Gaffer tape box", "quantity": 1 }),
    )
    .await;
    let second_id = second["id"].as_i64().expect("material id");

    post_json(&client, &token, &format!("/events/{}/submit-for-review", event_id), json!({})).await;
    for id in [material_id, second_id] {
        let (_, line) = post_json(
            &client,
            &token,
            &format!("/events/{}/materials/{}/review", event_id, id),
            json!({}),
        )
        .await;
        assert_eq!(line["reviewed"], true);
    }

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/return-for-correction", event_id),
        json!({ "note": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = post_json(
        &client,
        &token,
        &format!("/events/{}/return-for-correction", event_id),
        json!({ "note": "Add spare lamps" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["status"], "PLANNING");
    assert_eq!(event["correction_note"], "Add spare lamps");

    let (_, lines) = get_json(&client, &token, &format!("/events/{}/materials", event_id)).await;
    let lines = lines.as_array().expect("material lines");
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["reviewed"] == false));
}

#[tokio::test]
#[ignore]
async fn test_clone_copies_lines_and_crew_only() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, _, material_id) = planned_event(&client, &token, 10, 3).await;

    let (_, staff) = post_json(
        &client,
        &token,
        "/staff",
        json!({ "name": format!("Rigger {}", unique_suffix()) }),
    )
    .await;
    let staff_id = staff["id"].as_i64().expect("staff id");
    let (status, _) = put_json(
        &client,
        &token,
        &format!("/events/{}/crew", event_id),
        json!({ "staff_ids": [staff_id] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, vehicle) = post_json(
        &client,
        &token,
        "/vehicles",
        json!({ "name": "Van", "plate": format!("V{}", unique_suffix()) }),
    )
    .await;
    put_json(
        &client,
        &token,
        &format!("/events/{}/vehicles", event_id),
        json!({ "vehicle_ids": [vehicle["id"]] }),
    )
    .await;

    let (_, consumable) = post_json(
        &client,
        &token,
        "/consumables",
        json!({ "name": format!("Cable ties {}", unique_suffix()), "quantity_in_stock": 100 }),
    )
    .await;
    post_json(
        &client,
        &token,
        &format!("/events/{}/consumables", event_id),
        json!({ "consumable_id": consumable["id"], "quantity": 20 }),
    )
    .await;

    approved_event(&client, &token, event_id, &[material_id]).await;
    post_json(
        &client,
        &token,
        &format!("/events/{}/departure", event_id),
        json!({ "items": [{ "material_id": material_id, "quantity": 2 }] }),
    )
    .await;

    let (status, copy) = post_json(
        &client,
        &token,
        &format!("/events/{}/clone", event_id),
        json!({ "start_date": "2031-01-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["status"], "PLANNING");
    assert!(copy["correction_note"].is_null());
    assert!(copy["name"].as_str().unwrap_or_default().starts_with("Copy of - "));
    let copy_id = copy["id"].as_i64().expect("clone id");

    let (_, lines) = get_json(&client, &token, &format!("/events/{}/materials", copy_id)).await;
    let lines = lines.as_array().expect("material lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 3);
    assert_eq!(lines[0]["quantity_out"], 0);
    assert_eq!(lines[0]["reviewed"], false);

    let (_, crew) = get_json(&client, &token, &format!("/events/{}/crew", copy_id)).await;
    let crew = crew.as_array().expect("crew");
    assert_eq!(crew.len(), 1);
    assert_eq!(crew[0]["id"], staff_id);

    let (_, vehicles) = get_json(&client, &token, &format!("/events/{}/vehicles", copy_id)).await;
    assert!(vehicles.as_array().expect("vehicles").is_empty());
    let (_, consumables) =
        get_json(&client, &token, &format!("/events/{}/consumables", copy_id)).await;
    assert!(consumables.as_array().expect("consumables").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_reinforcement_extends_and_creates_lines() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, equipment_id, material_id) = planned_event(&client, &token, 10, 4).await;
    let (_, extra) = post_json(
        &client,
        &token,
        "/equipment",
        json!({ "model": format!("Hazer {}", unique_suffix()), "quantity_in_stock": 3 }),
    )
    .await;
    let extra_id = extra["id"].as_i64().expect("equipment id");

    approved_event(&client, &token, event_id, &[material_id]).await;
    post_json(
        &client,
        &token,
        &format!("/events/{}/departure", event_id),
        json!({ "items": [{ "material_id": material_id, "quantity": 4 }] }),
    )
    .await;
    assert_eq!(stock_of(&client, &token, equipment_id).await, (6, 0));

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/reinforcement", event_id),
        json!({ "items": [{ "equipment_id": extra_id, "quantity": 4 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/reinforcement", event_id),
        json!({
            "items": [
                { "equipment_id": equipment_id, "quantity": 2 },
                { "equipment_id": extra_id, "quantity": 1 }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(stock_of(&client, &token, equipment_id).await, (4, 0));
    assert_eq!(stock_of(&client, &token, extra_id).await, (2, 0));

    let (_, lines) = get_json(&client, &token, &format!("/events/{}/materials", event_id)).await;
    let lines = lines.as_array().expect("material lines");
    assert_eq!(lines.len(), 2);
    let extended = lines
        .iter()
        .find(|l| l["id"] == material_id)
        .expect("original line");
    assert_eq!(extended["quantity"], 6);
    assert_eq!(extended["quantity_out"], 6);
    let created = lines
        .iter()
        .find(|l| l["equipment_id"] == extra_id)
        .expect("reinforcement line");
    assert_eq!(created["quantity"], 1);
    assert_eq!(created["quantity_out"], 1);
}

#[tokio::test]
#[ignore]
async fn test_repair_returns_one_unit_once() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment) = post_json(
        &client,
        &token,
        "/equipment",
        json!({ "model": format!("Fresnel {}", unique_suffix()), "quantity_in_stock": 5 }),
    )
    .await;
    let equipment_id = equipment["id"].as_i64().expect("equipment id");

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/equipment/{}/send-to-maintenance", equipment_id),
        json!({ "quantity": 3, "problem_description": "Flickering" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&client, &token, equipment_id).await, (2, 3));

    let (_, open) = get_json(&client, &token, "/maintenance").await;
    let records: Vec<i64> = open
        .as_array()
        .expect("open records")
        .iter()
        .filter(|r| r["equipment_id"] == equipment_id)
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(records.len(), 3);

    let path = format!("/maintenance/{}/status", records[0]);
    let (status, _) = put_json(
        &client,
        &token,
        &path,
        json!({ "status": "REPAIRED", "solution": "New lamp" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&client, &token, equipment_id).await, (3, 2));

    let (status, _) = put_json(
        &client,
        &token,
        &path,
        json!({ "status": "REPAIRED", "solution": "New lamp and fuse" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&client, &token, equipment_id).await, (3, 2));

    let (_, history) = get_json(&client, &token, "/maintenance/history").await;
    assert!(history
        .as_array()
        .expect("repaired records")
        .iter()
        .any(|r| r["id"] == records[0]));
}

#[tokio::test]
#[ignore]
async fn test_cancel_rejected_once_in_progress() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, _, material_id) = planned_event(&client, &token, 10, 1).await;
    approved_event(&client, &token, event_id, &[material_id]).await;
    post_json(
        &client,
        &token,
        &format!("/events/{}/departure", event_id),
        json!({ "items": [{ "material_id": material_id, "quantity": 1 }] }),
    )
    .await;

    let (status, _) = post_json(
        &client,
        &token,
        &format!("/events/{}/cancel", event_id),
        json!({ "reason": "Too late", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, details) = get_json(&client, &token, &format!("/events/{}", event_id)).await;
    assert_eq!(details["status"], "IN_PROGRESS");
}

#[tokio::test]
#[ignore]
async fn test_update_rejects_end_before_stored_start() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (event_id, _, _) = planned_event(&client, &token, 1, 1).await;

    let (status, _) = put_json(
        &client,
        &token,
        &format!("/events/{}", event_id),
        json!({ "end_date": "2030-08-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = put_json(
        &client,
        &token,
        &format!("/events/{}", event_id),
        json!({ "end_date": "2030-09-05" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["end_date"], "2030-09-05");
}

//! End-to-end tests against a served router on an ephemeral port

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use lodgings::db::schemas::lodging_schema;
use lodgings::db::MemoryLodgingStore;
use lodgings::legacy::LegacyStore;
use lodgings::{serve, AppState};

async fn spawn_server() -> SocketAddr {
    let state = Arc::new(AppState::new(
        Arc::new(MemoryLodgingStore::new()),
        LegacyStore::bundled().unwrap(),
        lodging_schema(false),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));
    addr
}

fn lodging(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Integration test lodging",
        "address": "123 SW 1st St., Corvallis, OR 97333",
        "price": 99,
        "ownerid": "14"
    })
}

#[tokio::test]
async fn test_create_and_list_roundtrip() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/lodgings", addr))
        .json(&lodging("Roundtrip"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    assert!(response.headers().contains_key("x-request-id"));
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let page: Value = client
        .get(format!("http://{}/lodgings?page=1", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["count"], json!(1));
    let stored = &page["lodgings"][0];
    assert_eq!(stored["_id"], json!(id));

    let mut expected = lodging("Roundtrip");
    expected["_id"] = json!(id);
    assert_eq!(stored, &expected);
}

#[tokio::test]
async fn test_invalid_create_rejected() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/lodgings", addr))
        .json(&json!({ "name": "No address", "price": 10, "ownerid": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "err": "Request body does not contain a valid Lodging." })
    );

    let page: Value = client
        .get(format!("http://{}/lodgings", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], json!(0));
}

#[tokio::test]
async fn test_legacy_delete_then_get() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/lodgings/0", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("http://{}/lodgings/0", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("http://{}/lodgings/0", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "err": "The path /lodgings/0 doesn't exist" }));
}

#[tokio::test]
async fn test_legacy_out_of_range() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/lodgings/9999", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["err"], json!("The path /lodgings/9999 doesn't exist"));
}

#[tokio::test]
async fn test_legacy_put() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("http://{}/lodgings/1", addr))
        .json(&lodging("Replaced"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let body: Value = client
        .get(format!("http://{}/lodgings/1", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, lodging("Replaced"));

    let response = client
        .put(format!("http://{}/lodgings/1", addr))
        .json(&json!({ "name": "Missing fields" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_pagination_bounds() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    for i in 0..25 {
        let response = client
            .post(format!("http://{}/lodgings", addr))
            .json(&lodging(&format!("Lodging {}", i)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let last: Value = client
        .get(format!("http://{}/lodgings?page=100", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(last["page"], json!(3));
    assert_eq!(last["totalPages"], json!(3));
    assert_eq!(last["lodgings"].as_array().unwrap().len(), 5);

    let first: Value = client
        .get(format!("http://{}/lodgings?page=abc", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["page"], json!(1));
    assert_eq!(first["lodgings"].as_array().unwrap().len(), 10);
    assert_eq!(first["lodgings"][0]["name"], json!("Lodging 0"));
}

#[tokio::test]
async fn test_unknown_path() {
    let addr = spawn_server().await;

    let response = reqwest::get(format!("http://{}/owners/3?full=true", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "err": "The path /owners/3?full=true doesn't exist" })
    );
}

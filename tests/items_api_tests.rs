use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use pricebook::auth::token::TokenService;
use pricebook::bridge::WorkerPool;
use pricebook::cache::ResponseCache;
use pricebook::router::{AppState, app_router};
use pricebook::store::memory::MemoryStore;

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store,
        TokenService::new("items-test-secret", 30),
        WorkerPool::new(4),
        ResponseCache::new(Duration::from_secs(60)),
    );
    app_router(state)
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

async fn send(app: &Router, method: &str, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed")
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = test_app();

    let resp = send_json(&app, "POST", "/items", &json!({"name": "Peewee Book", "price": 35.0})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = read_json(resp).await;
    let id = created["id"].as_i64().expect("created item has no id");
    assert_eq!(created["name"], "Peewee Book");
    assert_eq!(created["price"], 35.0);

    let resp = send(&app, "GET", &format!("/items/{id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, created);
}

#[tokio::test]
async fn create_validates_name_and_price() {
    let app = test_app();

    for body in [
        json!({"name": "ab", "price": 1.0}),
        json!({"name": "x".repeat(51), "price": 1.0}),
        json!({"name": "valid name", "price": 0.0}),
        json!({"name": "valid name", "price": -2.5}),
    ] {
        let resp = send_json(&app, "POST", "/items", &body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err = read_json(resp).await;
        assert_eq!(err["error"]["code"], "VALIDATION");
    }
}

#[tokio::test]
async fn list_returns_each_created_item() {
    let app = test_app();

    let mut ids = Vec::new();
    for n in 0..5 {
        let body = json!({"name": format!("item number {n}"), "price": 1.0 + n as f64});
        let resp = send_json(&app, "POST", "/items", &body).await;
        let created = read_json(resp).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let resp = send(&app, "GET", "/items").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = read_json(resp).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(5));

    for id in ids {
        let resp = send(&app, "GET", &format!("/items/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn patch_with_price_only_preserves_name() {
    let app = test_app();

    let resp = send_json(&app, "POST", "/items", &json!({"name": "stable name", "price": 10.0})).await;
    let created = read_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send_json(&app, "PATCH", &format!("/items/{id}"), &json!({"price": 12.5})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = read_json(resp).await;
    assert_eq!(updated["name"], "stable name");
    assert_eq!(updated["price"], 12.5);

    let resp = send(&app, "GET", &format!("/items/{id}")).await;
    assert_eq!(read_json(resp).await, updated);
}

#[tokio::test]
async fn patch_validates_supplied_fields() {
    let app = test_app();

    let resp = send_json(&app, "POST", "/items", &json!({"name": "stable name", "price": 10.0})).await;
    let id = read_json(resp).await["id"].as_i64().unwrap();

    let resp = send_json(&app, "PATCH", &format!("/items/{id}"), &json!({"name": "ab"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send_json(&app, "PATCH", &format!("/items/{id}"), &json!({"price": -1.0})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
    let app = test_app();
    let resp = send_json(&app, "PATCH", "/items/999", &json!({"price": 1.0})).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_204_then_404() {
    let app = test_app();

    let resp = send_json(&app, "POST", "/items", &json!({"name": "doomed item", "price": 1.0})).await;
    let id = read_json(resp).await["id"].as_i64().unwrap();

    let resp = send(&app, "DELETE", &format!("/items/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "DELETE", &format!("/items/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "GET", &format!("/items/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_a_client_error() {
    let app = test_app();
    let resp = send(&app, "GET", "/items/not-a-number").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn home_page_escapes_item_names() {
    let app = test_app();

    let hostile = "<script>alert('CodingPartner');</script>";
    let resp = send_json(&app, "POST", "/items", &json!({"name": hostile, "price": 1.0})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&app, "GET", "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = std::str::from_utf8(&bytes).unwrap();
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn stats_are_served_from_the_cache_within_a_bucket() {
    let app = test_app();

    let resp = send(&app, "GET", "/stats").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first = read_json(resp).await;
    assert_eq!(first["item_count"], 0);

    send_json(&app, "POST", "/items", &json!({"name": "new item", "price": 1.0})).await;

    // Still inside the 60s test bucket, so the stale count is expected.
    let resp = send(&app, "GET", "/stats").await;
    assert_eq!(read_json(resp).await, first);
}

#[tokio::test]
async fn profile_sanitization_accepts_and_rejects() {
    let app = test_app();

    let resp = send_json(
        &app,
        "POST",
        "/profile",
        &json!({"username": "testuser", "user_id": 1, "bio": "  hello there  "}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["bio_length"], 11);

    for bio in ["line\nbreak", "line\rbreak", "<script>x</script>", "<ScRiPt>x"] {
        let resp = send_json(
            &app,
            "POST",
            "/profile",
            &json!({"username": "testuser", "user_id": 1, "bio": bio}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "bio: {bio:?}");
    }
}

#[tokio::test]
async fn info_echoes_connection_metadata() {
    let app = test_app();

    let addr: SocketAddr = "10.1.2.3:4567".parse().unwrap();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/info")
                .header("user-agent", "pricebook-test/1.0")
                .extension(ConnectInfo(addr))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["client_host"], "10.1.2.3");
    assert_eq!(body["user_agent"], "pricebook-test/1.0");
}

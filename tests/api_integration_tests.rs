//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against one shared router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use ucache::{api::create_router, AppState, Config};

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()).unwrap())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn put_value(app: &Router, key: &str, value: &str) {
    let body = format!(r#"{{"key":"{}","value":{}}}"#, key, value);
    let (status, json) = send(app, "PUT", "/set", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let app = create_test_app();
    put_value(&app, "k", "42").await;

    let (status, json) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "k");
    assert_eq!(json["value"], 42);
}

#[tokio::test]
async fn test_get_missing_key_is_not_found() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/get/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_set_with_empty_key_is_usage_error() {
    let app = create_test_app();
    let (status, json) = send(&app, "PUT", "/set", Some(r#"{"key":"","value":1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "A key name must be given");
}

#[tokio::test]
async fn test_add_keeps_existing_value() {
    let app = create_test_app();
    put_value(&app, "k", r#""first""#).await;

    let (status, json) = send(&app, "POST", "/add", Some(r#"{"key":"k","value":"second"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], false);

    let (_, json) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(json["value"], "first");
}

// == Counters ==

#[tokio::test]
async fn test_inc_and_dec() {
    let app = create_test_app();
    put_value(&app, "hits", "1").await;

    let (_, json) = send(&app, "POST", "/inc/hits", None).await;
    assert_eq!(json["value"], 2);

    let (_, json) = send(&app, "POST", "/dec/hits", Some(r#"{"by":5}"#)).await;
    assert_eq!(json["value"], -3);
    assert_eq!(json["succeeded"], true);

    let (_, json) = send(&app, "POST", "/inc/absent", None).await;
    assert!(json["value"].is_null());
    assert_eq!(json["succeeded"], false);
}

#[tokio::test]
async fn test_counter_with_malformed_body_is_rejected() {
    let app = create_test_app();
    put_value(&app, "n", "10").await;

    let (status, json) = send(&app, "POST", "/inc/n", Some(r#"{"by":"five"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid request"));

    let (_, json) = send(&app, "GET", "/get/n", None).await;
    assert_eq!(json["value"], 10);
}

// == DELETE ==

#[tokio::test]
async fn test_delete_by_wildcard() {
    let app = create_test_app();
    put_value(&app, "session:1", "1").await;
    put_value(&app, "session:2", "2").await;
    put_value(&app, "user:1", "3").await;

    let (status, json) = send(&app, "DELETE", "/del/session:*", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], 2);

    let (_, json) = send(&app, "GET", "/exists/user:1", None).await;
    assert_eq!(json["exists"], true);
}

#[tokio::test]
async fn test_delete_by_delimited_pattern() {
    let app = create_test_app();
    put_value(&app, "a1", "1").await;
    put_value(&app, "a2", "2").await;
    put_value(&app, "b1", "3").await;

    let (status, json) = send(&app, "DELETE", "/del//%5Ea/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["search"], "/^a/");
    assert_eq!(json["deleted"], 2);

    let (_, json) = send(&app, "GET", "/exists/b1", None).await;
    assert_eq!(json["exists"], true);
}

#[tokio::test]
async fn test_delete_unmatched_wildcard_deletes_nothing() {
    let app = create_test_app();
    put_value(&app, "keep", "1").await;

    let (status, json) = send(&app, "DELETE", "/del/zzz*", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["search"], "zzz*");
    assert_eq!(json["deleted"], 0);
}

#[tokio::test]
async fn test_delete_literal_key() {
    let app = create_test_app();
    put_value(&app, "plain", "1").await;

    let (_, json) = send(&app, "DELETE", "/del/plain", None).await;
    assert_eq!(json["deleted"], 1);

    let (status, _) = send(&app, "GET", "/get/plain", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Statistics ==

#[tokio::test]
async fn test_stats_follow_mutations() {
    let app = create_test_app();

    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["items"], 0);

    put_value(&app, "a", "1").await;
    put_value(&app, "b", "2").await;
    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["items"], 2);
    assert_eq!(json["is_local"], true);

    let (_, json) = send(&app, "POST", "/clear", None).await;
    assert_eq!(json["cleared"], true);
    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["items"], 0);
}

#[tokio::test]
async fn test_rejected_set_leaves_store_and_stats_unchanged() {
    let app = create_router(
        AppState::from_config(&Config {
            memory_limit: 200,
            ..Config::default()
        })
        .unwrap(),
    );
    put_value(&app, "k", r#""small""#).await;
    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["items"], 1);

    let big = format!(r#"{{"key":"k","value":"{}"}}"#, "x".repeat(500));
    let (status, json) = send(&app, "PUT", "/set", Some(&big)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], false);

    let (_, json) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(json["value"], "small");
    let (_, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(json["items"], 1);
    let (_, json) = send(&app, "GET", "/entries", None).await;
    assert_eq!(json[0]["key_name"], "k");
}

#[tokio::test]
async fn test_meminfo_and_entries() {
    let app = create_test_app();
    put_value(&app, "k", r#"{"nested":true}"#).await;

    let (status, json) = send(&app, "GET", "/meminfo", None).await;
    assert_eq!(status, StatusCode::OK);
    let total = json["total"].as_u64().unwrap();
    let free = json["free"].as_u64().unwrap();
    assert_eq!(json["used"].as_u64().unwrap(), total - free);
    assert_eq!(json["used_blocks"], 1);
    assert!(json["used_percent"].as_f64().unwrap() >= 0.0);

    let (_, json) = send(&app, "GET", "/entries", None).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["key_name"], "k");
    assert_eq!(entries[0]["value_type"], "object");
}

// == Default TTL ==

#[tokio::test]
async fn test_default_ttl_applies_to_set() {
    let app = create_test_app();

    let (_, json) = send(&app, "PUT", "/ttl", Some(r#"{"default_ttl":600}"#)).await;
    assert_eq!(json["default_ttl"], 600);

    put_value(&app, "k", "1").await;
    let (_, json) = send(&app, "GET", "/entries", None).await;
    assert_eq!(json[0]["ttl_seconds"], 600);

    let (_, json) = send(&app, "GET", "/ttl", None).await;
    assert_eq!(json["default_ttl"], 600);
}

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();
    let (status, _) = send(&app, "PUT", "/set", Some(r#"{"key":"brief","value":1,"ttl":1}"#)).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let (status, _) = send(&app, "GET", "/get/brief", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Errors ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use memo_cache::{api::create_router, AppState, Cache, EnvironmentCapabilities};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(backend: &str, capacity: usize) -> Router {
    let cache =
        Cache::with_memory_capacity(backend.into(), &EnvironmentCapabilities::none(), capacity)
            .unwrap();
    create_router(AppState::new(cache, 300))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn put_json(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_returns_value() {
    let app = create_test_app("memory", 100);

    let (status, json) = put_json(&app, json!({"key": "page", "value": {"html": "<p>x</p>"}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"key": "page", "stored": true}));

    let (status, json) = send(&app, "GET", "/get/page").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], json!({"html": "<p>x</p>"}));
}

#[tokio::test]
async fn test_cached_false_is_found() {
    let app = create_test_app("memory", 100);

    put_json(&app, json!({"key": "flag", "value": false, "ttl": 60})).await;

    let (status, json) = send(&app, "GET", "/get/flag").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], json!(false));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let app = create_test_app("memory", 100);

    let (status, json) = send(&app, "GET", "/get/nonexistent_key").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent_key"));
}

#[tokio::test]
async fn test_zero_ttl_is_never_visible() {
    let app = create_test_app("memory", 100);

    let (_, json) = put_json(&app, json!({"key": "brief", "value": 1, "ttl": 0})).await;
    assert_eq!(json["stored"], json!(true));

    let (status, _) = send(&app, "GET", "/get/brief").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_empty_key_is_bad_request() {
    let app = create_test_app("memory", 100);

    let (status, _) = put_json(&app, json!({"key": "", "value": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == DELETE ==

#[tokio::test]
async fn test_delete_reports_removal() {
    let app = create_test_app("memory", 100);

    put_json(&app, json!({"key": "gone", "value": "soon"})).await;

    let (status, json) = send(&app, "DELETE", "/del/gone").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], json!(true));

    let (status, json) = send(&app, "DELETE", "/del/gone").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], json!(false));

    let (status, _) = send(&app, "GET", "/get/gone").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Eviction through the API ==

#[tokio::test]
async fn test_overflow_evicts_first_inserted_key() {
    let app = create_test_app("memory", 3);

    for key in ["k1", "k2", "k3", "k4"] {
        put_json(&app, json!({"key": key, "value": key})).await;
    }

    let (status, _) = send(&app, "GET", "/get/k1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for key in ["k2", "k3", "k4"] {
        let (status, json) = send(&app, "GET", &format!("/get/{key}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["value"], json!(key));
    }

    let (_, stats) = send(&app, "GET", "/stats").await;
    assert_eq!(stats["evictions"], json!(1));
    assert_eq!(stats["total_entries"], json!(3));
}

// == No-op backend ==

#[tokio::test]
async fn test_nocache_backend_never_stores() {
    let app = create_test_app("nocache", 100);

    let (status, json) = put_json(&app, json!({"key": "a", "value": "1", "ttl": 5})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], json!(false));

    let (status, _) = send(&app, "GET", "/get/a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/stats").await;
    assert_eq!(stats, json!({"cache_type": "nocache", "memory_cache_size": null}));
}

// == STATS / HEALTH ==

#[tokio::test]
async fn test_stats_counts_hits_and_misses() {
    let app = create_test_app("memory", 50);

    put_json(&app, json!({"key": "a", "value": 1})).await;
    send(&app, "GET", "/get/a").await;
    send(&app, "GET", "/get/b").await;

    let (status, stats) = send(&app, "GET", "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["cache_type"], json!("memory"));
    assert_eq!(stats["memory_cache_size"], json!(50));
    assert_eq!(stats["hits"], json!(1));
    assert_eq!(stats["misses"], json!(1));
    assert_eq!(stats["hit_rate"], json!(0.5));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app("memory", 10);

    let (status, json) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], json!("healthy"));
    assert_eq!(json["cache_type"], json!("memory"));
}

// == Live server ==

#[tokio::test]
async fn test_live_server_roundtrip() {
    let app = create_test_app("memory", 10);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let set: Value = client
        .put(format!("{base}/set"))
        .json(&json!({"key": "live", "value": [1, 2, 3]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(set["stored"], json!(true));

    let got: Value = client
        .get(format!("{base}/get/live"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(got["value"], json!([1, 2, 3]));

    let missing = client.get(format!("{base}/get/absent")).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    server.abort();
}

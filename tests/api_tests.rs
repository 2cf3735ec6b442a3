use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use alice_display_api::api::{create_router, AppState};
use alice_display_api::error::AppResult;
use alice_display_api::models::{ContextDefaults, ImageRecord};
use alice_display_api::services::catalog::{CatalogQuery, ImageCatalog, InMemoryCatalog};

fn image(id: &str, weather: &str, time_period: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        title: format!("Image {}", id),
        display_url: format!("https://cdn.test/{}.jpg", id),
        weather: weather.to_string(),
        time_period: time_period.to_string(),
        activity: Some("Reading".to_string()),
        rating_score: 3,
        total_ratings: 6,
        verified: true,
        special_occasion_tag: None,
    }
}

/// Records how many times the gallery was read
struct CountingCatalog {
    inner: InMemoryCatalog,
    fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl ImageCatalog for CountingCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> AppResult<Vec<ImageRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(query).await
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

fn server_with_catalog(catalog: Arc<dyn ImageCatalog>) -> TestServer {
    let state = AppState::new(
        catalog,
        ContextDefaults {
            weather: "Sunny".to_string(),
            time_period: "Afternoon".to_string(),
        },
    );
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server(images: Vec<ImageRecord>) -> TestServer {
    server_with_catalog(Arc::new(InMemoryCatalog::new(images)))
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(vec![]);
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_change_endpoint_descriptor() {
    let server = create_test_server(vec![]);
    let response = server.get("/api/image/change").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["endpoint"], "/api/image/change");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server(vec![]);
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("6f1c2f0e-8a4b-4c1d-9a55-3d2f4a7b9e10"),
        )
        .await;

    let echoed = response.headers().get("x-request-id").unwrap();
    assert_eq!(echoed.to_str().unwrap(), "6f1c2f0e-8a4b-4c1d-9a55-3d2f4a7b9e10");
}

#[tokio::test]
async fn test_change_image_exact_match() {
    let server = create_test_server(vec![
        image("current", "Sunny", "Morning"),
        image("next", "Sunny", "Morning"),
    ]);

    let response = server
        .post("/api/image/change")
        .json(&json!({
            "current_image_id": "current",
            "context": { "weather": "Sunny", "time_period": "Morning", "hour": 9 }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["image"]["id"], "next");
    assert_eq!(body["image"]["display_url"], "https://cdn.test/next.jpg");
    assert_eq!(body["image"]["activity"], "Reading");
    assert_eq!(body["image"]["rating_score"], 3);
    assert_eq!(body["match"]["stage"], "exact");
    assert_eq!(body["match"]["candidates"], 1);
}

#[tokio::test]
async fn test_change_image_weather_fallback() {
    let server = create_test_server(vec![image("cloudy", "Cloudy", "Morning")]);

    let response = server
        .post("/api/image/change")
        .json(&json!({
            "context": { "weather": "sunny", "time_period": "morning" }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["image"]["id"], "cloudy");
    assert_eq!(body["match"]["stage"], "weather_fallback");
    assert_eq!(body["match"]["weather"], "Cloudy");
}

#[tokio::test]
async fn test_change_image_no_alternative() {
    let server = create_test_server(vec![image("cloudy", "Cloudy", "Morning")]);

    let response = server
        .post("/api/image/change")
        .json(&json!({
            "current_image_id": "x",
            "context": { "weather": "Sunny", "time_period": "Night" }
        }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "success": false,
        "error": "no_alternatives_found",
        "message": "No alternative images found matching current context"
    }));
}

#[tokio::test]
async fn test_change_image_uses_default_context() {
    // Defaults are Sunny / Afternoon; a night image must not be chosen
    let server = create_test_server(vec![
        image("night", "Sunny", "Night"),
        image("golden", "Rainy", "Golden Hour"),
    ]);

    let response = server.post("/api/image/change").json(&json!({})).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["image"]["id"], "golden");
    assert_eq!(body["match"]["stage"], "compatible_time");
}

#[tokio::test]
async fn test_change_image_rejects_non_string_weather() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let server = server_with_catalog(Arc::new(CountingCatalog {
        inner: InMemoryCatalog::new(vec![image("a", "Sunny", "Morning")]),
        fetches: fetches.clone(),
    }));

    let response = server
        .post("/api/image/change")
        .json(&json!({ "context": { "weather": 7 } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    // Rejected before the gallery is read
    assert_eq!(fetches.load(Ordering::SeqCst), 0);

    let response = server
        .post("/api/image/change")
        .json(&json!({ "context": { "weather": "Sunny", "time_period": "Morning" } }))
        .await;

    response.assert_status_ok();
    // One snapshot read per request
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_change_image_rejects_invalid_json() {
    let server = create_test_server(vec![image("a", "Sunny", "Morning")]);

    let response = server
        .post("/api/image/change")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

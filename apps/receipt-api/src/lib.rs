//! # Receipt API
//!
//! HTTP server for processing receipts and looking up their points.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Receipt API Routes                              │
//! │                                                                         │
//! │  POST /receipts/process       submit a receipt  → {"id"}               │
//! │  GET  /receipts/{id}/points   points for an id  → {"points"}           │
//! │  GET  /receipts/{id}          stored receipt    → receipt + points     │
//! │  GET  /health                 liveness          → "OK"                 │
//! │  GET  /health/ready           store reachable   → "OK" | 503           │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState { store: Arc<dyn ReceiptStore> }                       │  │
//! │  │  SQLite (ReceiptRepository) in the binary, in-memory in tests    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `RECEIPT_API_BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `RECEIPT_API_PORT` - Listen port (default: 8080)
//! - `RECEIPT_DATABASE_PATH` - SQLite file (default: ./receipts.db)
//! - `RECEIPT_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `RUST_LOG` - Log filter

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use receipt_db::ReceiptStore;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReceiptStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReceiptStore>) -> Self {
        AppState { store }
    }
}

/// Builds the router with every route and the request trace layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/receipts/process", post(handlers::receipts::process_receipt))
        .route("/receipts/{id}/points", get(handlers::receipts::get_points))
        .route("/receipts/{id}", get(handlers::receipts::get_receipt))
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use receipt_db::{Database, DbConfig, InMemoryReceiptStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use failing::FailingStore;

    fn memory_app() -> Router {
        build_router(AppState::new(Arc::new(InMemoryReceiptStore::new())))
    }

    async fn sqlite_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        build_router(AppState::new(Arc::new(db.receipts())))
    }

    fn target_json() -> Value {
        json!({
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "items": [
                {"shortDescription": "Mountain Dew 12PK", "price": "6.49"},
                {"shortDescription": "Emils", "price": "12.25"},
                {"shortDescription": "Knorr Creamy Chicken", "price": "1.26"},
                {"shortDescription": "Doritos Nacho Cheese", "price": "3.35"},
                {"shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00"}
            ],
            "total": "35.35"
        })
    }

    fn corner_market_json() -> Value {
        json!({
            "retailer": "M&M Corner Market",
            "purchaseDate": "2022-03-20",
            "purchaseTime": "14:33",
            "items": [
                {"shortDescription": "Gatorade", "price": "2.25"},
                {"shortDescription": "Gatorade", "price": "2.25"},
                {"shortDescription": "Gatorade", "price": "2.25"},
                {"shortDescription": "Gatorade", "price": "2.25"}
            ],
            "total": "9.00"
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/receipts/process")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn process(app: &Router, receipt: Value) -> String {
        let (status, body) = send(app, post_json(receipt.to_string())).await;
        assert_eq!(status, StatusCode::OK, "body: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_process_then_points() {
        for app in [memory_app(), sqlite_app().await] {
            let id = process(&app, target_json()).await;
            assert!(uuid::Uuid::parse_str(&id).is_ok());

            let (status, body) = send(&app, get(&format!("/receipts/{id}/points"))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"points": 25}));

            let id = process(&app, corner_market_json()).await;
            let (_, body) = send(&app, get(&format!("/receipts/{id}/points"))).await;
            assert_eq!(body, json!({"points": 109}));
        }
    }

    #[tokio::test]
    async fn test_each_process_gets_a_new_id() {
        let app = memory_app();
        let first = process(&app, target_json()).await;
        let second = process(&app, target_json()).await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_get_full_receipt() {
        let app = sqlite_app().await;
        let id = process(&app, corner_market_json()).await;

        let (status, body) = send(&app, get(&format!("/receipts/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["retailer"], "M&M Corner Market");
        assert_eq!(body["purchaseTime"], "14:33");
        assert_eq!(body["total"], "9.00");
        assert_eq!(body["points"], 109);
        assert_eq!(body["items"].as_array().unwrap().len(), 4);
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let app = memory_app();

        let (status, body) = send(&app, get("/receipts/does-not-exist/points")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No receipt found for that ID"}));

        let (status, _) = send(&app, get("/receipts/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = memory_app();

        for body in ["{not json", r#""a string""#, r#"{"retailer": 42}"#] {
            let (status, response) = send(&app, post_json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                response,
                json!({"error": "Please verify input. Invalid JSON format"})
            );
        }
    }

    #[tokio::test]
    async fn test_validation_errors_are_listed() {
        let app = memory_app();
        let mut receipt = target_json();
        receipt["retailer"] = json!("Bob's");
        receipt["total"] = json!("35.3");
        receipt["items"][2]["price"] = json!("1.2");

        let (status, body) = send(&app, post_json(receipt.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["retailer", "total", "items[2].price"]);
        assert!(body["errors"][0]["message"].as_str().unwrap().contains("ampersands"));
    }

    #[tokio::test]
    async fn test_loose_date_and_time_layouts_are_rejected() {
        let store = Arc::new(InMemoryReceiptStore::new());
        let app = build_router(AppState::new(store.clone()));

        let mut receipt = target_json();
        receipt["purchaseDate"] = json!("22-01-01");
        receipt["purchaseTime"] = json!("13:1");

        let (status, body) = send(&app, post_json(receipt.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "purchaseDate");
        assert_eq!(body["errors"][1]["field"], "purchaseTime");
        assert_eq!(store.count().await.unwrap(), 0);

        receipt["purchaseDate"] = json!("2022-01-01");
        receipt["purchaseTime"] = json!("9:05");
        let id = process(&app, receipt).await;
        let (_, body) = send(&app, get(&format!("/receipts/{id}"))).await;
        assert_eq!(body["purchaseTime"], "09:05");
    }

    #[tokio::test]
    async fn test_missing_items_is_a_validation_error() {
        let app = memory_app();
        let mut receipt = target_json();
        receipt.as_object_mut().unwrap().remove("items");

        let (status, body) = send(&app, post_json(receipt.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "items");
    }

    #[tokio::test]
    async fn test_rejected_receipt_is_not_stored() {
        let store = Arc::new(InMemoryReceiptStore::new());
        let app = build_router(AppState::new(store.clone()));

        let mut receipt = target_json();
        receipt["purchaseDate"] = json!("2022-02-30");
        let (status, _) = send(&app, post_json(receipt.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500_without_details() {
        let app = build_router(AppState::new(Arc::new(FailingStore)));

        let (status, body) = send(&app, post_json(target_json().to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to store or read receipt"}));

        let (status, _) = send(&app, get("/receipts/any/points")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_probes() {
        let app = memory_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".to_string()));

        let (status, _) = send(&app, get("/health/ready")).await;
        assert_eq!(status, StatusCode::OK);

        let failing = build_router(AppState::new(Arc::new(FailingStore)));
        let (status, _) = send(&failing, get("/health/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    /// A store whose every operation fails.
    mod failing {
        use receipt_core::ScoredReceipt;
        use receipt_db::{DbError, DbResult, ReceiptStore};

        pub struct FailingStore;

        #[async_trait::async_trait]
        impl ReceiptStore for FailingStore {
            async fn save(&self, _receipt: &ScoredReceipt) -> DbResult<()> {
                Err(DbError::QueryFailed("disk I/O error".to_string()))
            }

            async fn get_by_id(&self, _id: &str) -> DbResult<Option<ScoredReceipt>> {
                Err(DbError::PoolExhausted)
            }

            async fn count(&self) -> DbResult<i64> {
                Err(DbError::PoolExhausted)
            }

            async fn health_check(&self) -> bool {
                false
            }
        }
    }
}

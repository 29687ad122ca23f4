#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use purchase_order_api::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates a purchase order through the API and returns the response body.
    pub async fn create_order(&self, body: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/v1/purchase-orders", Some(body))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "create failed");
        response_json(response).await
    }

    /// Seeds the two reference orders: PO-1/Acme Corp/100.00/APPROVED and PO-2/Globex/50.00/DRAFT.
    pub async fn seed_reference_orders(&self) -> (Value, Value) {
        let first = self
            .create_order(order_body("PO-1", "Acme Corp", "100.00", "APPROVED", "USD"))
            .await;
        let second = self
            .create_order(order_body("PO-2", "Globex", "50.00", "DRAFT", "USD"))
            .await;
        (first, second)
    }
}

pub fn order_body(
    order_number: &str,
    supplier_name: &str,
    total_amount: &str,
    status: &str,
    currency: &str,
) -> Value {
    json!({
        "orderNumber": order_number,
        "supplierName": supplier_name,
        "status": status,
        "totalAmount": total_amount,
        "currency": currency,
        "expectedDeliveryDate": "2025-02-01"
    })
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

/// Order numbers of a list response, in response order.
pub fn order_numbers(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|order| order["orderNumber"].as_str().unwrap_or_default().to_string())
        .collect()
}

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use axum::http::{Method, StatusCode};
use common::{order_body, order_numbers, response_json, TestApp};
use rstest::rstest;
use serde_json::json;

/// Log sink shared with a thread-local subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn count(&self, message: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .to_lowercase()
            .matches(message)
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn create_returns_stored_record() {
    let app = TestApp::new().await;

    let created = app
        .create_order(order_body("PO-1", "Acme Corp", "100", "approved", "usd"))
        .await;

    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["orderNumber"], "PO-1");
    assert_eq!(created["supplierName"], "Acme Corp");
    assert_eq!(created["status"], "APPROVED");
    assert_eq!(created["currency"], "USD");
    assert_eq!(created["totalAmount"], "100.00");
    assert_eq!(created["expectedDeliveryDate"], "2025-02-01");
    assert!(created["createdAt"].is_string());
}

#[tokio::test]
async fn get_returns_what_was_created() {
    let app = TestApp::new().await;
    let created = app
        .create_order(order_body("PO-7", "Initech", "19.99", "SUBMITTED", "EUR"))
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(Method::GET, &format!("/api/v1/purchase-orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_without_filters_returns_everything_in_id_order() {
    let app = TestApp::new().await;
    app.seed_reference_orders().await;

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = response_json(response).await;
    assert_eq!(order_numbers(&list), vec!["PO-1", "PO-2"]);
}

#[rstest]
#[case::status_and_min_total("status=APPROVED&minTotal=10", &["PO-1"])]
#[case::text_query("q=acme", &["PO-1"])]
#[case::text_query_mixed_case("q=GLOB", &["PO-2"])]
#[case::text_query_on_order_number("q=po-", &["PO-1", "PO-2"])]
#[case::min_total_above_all("minTotal=200", &[])]
#[case::max_total("maxTotal=50", &["PO-2"])]
#[case::lowercase_status("status=draft", &["PO-2"])]
#[case::blank_status_is_ignored("status=&currency=", &["PO-1", "PO-2"])]
#[case::currency("currency=EUR", &[])]
#[case::wide_date_range("from=2000-01-01T00:00:00&to=2999-12-31T23:59:59", &["PO-1", "PO-2"])]
#[case::future_from("from=2999-01-01T00:00:00", &[])]
#[tokio::test]
async fn list_filters(#[case] query: &str, #[case] expected: &[&str]) {
    let app = TestApp::new().await;
    app.seed_reference_orders().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders?{query}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK, "query: {query}");
    let list = response_json(response).await;
    assert_eq!(order_numbers(&list), expected, "query: {query}");
}

#[rstest]
#[case::unknown_status(
    "status=bogus",
    "Invalid status value: bogus. Allowed values: DRAFT, SUBMITTED, APPROVED, REJECTED, CANCELLED"
)]
#[case::unknown_currency("currency=GBP", "Invalid currency value: GBP. Allowed values: USD, EUR")]
#[case::inverted_amounts("minTotal=100&maxTotal=10", "minimum total must not exceed maximum total")]
#[case::inverted_dates(
    "from=2025-02-01T00:00:00&to=2025-01-01T00:00:00",
    "'from' date must not be after 'to' date"
)]
#[case::negative_bound("minTotal=-1", "minTotal must not be negative")]
#[case::unparsable_amount("minTotal=ten", "Invalid minTotal value: ten")]
#[case::unparsable_date("from=01/01/2025", "Invalid from value: 01/01/2025")]
#[tokio::test]
async fn invalid_filters_are_bad_requests(#[case] query: &str, #[case] message: &str) {
    let app = TestApp::new().await;
    app.seed_reference_orders().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders?{query}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query: {query}");
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(
        body["message"].as_str().unwrap().contains(message),
        "query: {query}, body: {body}"
    );
}

#[rstest]
#[case::ten_million("10000000.00")]
#[case::fifty_million("50000000.00")]
#[tokio::test]
async fn large_totals_within_column_precision_are_accepted(#[case] total: &str) {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(order_body("PO-BIG", "Acme Corp", total, "APPROVED", "USD")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response).await;
    assert_eq!(created["totalAmount"], total);

    let list = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/purchase-orders?minTotal={total}"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(order_numbers(&list), vec!["PO-BIG"]);
}

#[tokio::test]
async fn text_query_folds_accented_capitals() {
    let app = TestApp::new().await;
    app.seed_reference_orders().await;
    app.create_order(order_body("PO-3", "COMPAÑÍA ANDINA", "75.00", "SUBMITTED", "EUR"))
        .await;

    for query in ["q=compa%C3%B1%C3%ADa", "q=%C3%B1", "q=Compa%C3%91%C3%8DA%20andina"] {
        let list = response_json(
            app.request(
                Method::GET,
                &format!("/api/v1/purchase-orders?{query}"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(order_numbers(&list), vec!["PO-3"], "query: {query}");
    }
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_identity() {
    let app = TestApp::new().await;
    let (first, _) = app.seed_reference_orders().await;
    let id = first["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{id}"),
            Some(order_body("PO-1A", "Acme Europe", "75.5", "SUBMITTED", "EUR")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;

    assert_eq!(updated["id"], first["id"]);
    assert_eq!(updated["createdAt"], first["createdAt"]);
    assert_eq!(updated["orderNumber"], "PO-1A");
    assert_eq!(updated["supplierName"], "Acme Europe");
    assert_eq!(updated["totalAmount"], "75.50");
    assert_eq!(updated["status"], "SUBMITTED");
    assert_eq!(updated["currency"], "EUR");
}

#[tokio::test]
async fn update_may_keep_its_own_order_number() {
    let app = TestApp::new().await;
    let (first, _) = app.seed_reference_orders().await;
    let id = first["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{id}"),
            Some(order_body("PO-1", "Acme Corp", "120.00", "APPROVED", "USD")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = TestApp::new().await;
    let (first, _) = app.seed_reference_orders().await;
    let uri = format!("/api/v1/purchase-orders/{}", first["id"]);

    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = response_json(
        app.request(Method::GET, "/api/v1/purchase-orders", None)
            .await,
    )
    .await;
    assert_eq!(order_numbers(&list), vec!["PO-2"]);
}

#[rstest]
#[case(Method::GET)]
#[case(Method::PUT)]
#[case(Method::DELETE)]
#[tokio::test]
async fn missing_id_is_not_found(#[case] method: Method) {
    let app = TestApp::new().await;
    let body = (method == Method::PUT)
        .then(|| order_body("PO-9", "Nobody", "1.00", "DRAFT", "USD"));

    let response = app
        .request(method, "/api/v1/purchase-orders/4242", body)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("4242"));
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/v1/purchase-orders/abc", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_order_number_is_conflict() {
    let app = TestApp::new().await;
    let (_, second) = app.seed_reference_orders().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(order_body("PO-1", "Someone Else", "5.00", "DRAFT", "USD")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("PO-1"));

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", second["id"]),
            Some(order_body("PO-1", "Globex", "50.00", "DRAFT", "USD")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case::missing_field(json!({
    "orderNumber": "PO-3",
    "status": "DRAFT",
    "totalAmount": "10.00",
    "currency": "USD",
    "expectedDeliveryDate": "2025-02-01"
}), "supplierName is required")]
#[case::blank_order_number(order_body("  ", "Acme", "10.00", "DRAFT", "USD"), "order_number")]
#[case::zero_amount(order_body("PO-3", "Acme", "0", "DRAFT", "USD"), "totalAmount must be greater than 0")]
#[case::three_decimals(order_body("PO-3", "Acme", "1.005", "DRAFT", "USD"), "at most 2 decimal places")]
#[case::above_column_precision(
    order_body("PO-3", "Acme", "100000000.00", "DRAFT", "USD"),
    "totalAmount must not exceed 99999999.99"
)]
#[case::unknown_status(order_body("PO-3", "Acme", "10.00", "SHIPPED", "USD"), "Invalid status value: SHIPPED")]
#[case::unknown_currency(order_body("PO-3", "Acme", "10.00", "DRAFT", "JPY"), "Invalid currency value: JPY")]
#[case::bad_date(json!({
    "orderNumber": "PO-3",
    "supplierName": "Acme",
    "status": "DRAFT",
    "totalAmount": "10.00",
    "currency": "USD",
    "expectedDeliveryDate": "next week"
}), "Invalid request body")]
#[tokio::test]
async fn invalid_bodies_are_rejected(#[case] body: serde_json::Value, #[case] message: &str) {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v1/purchase-orders", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = response_json(response).await;
    assert!(
        payload["message"].as_str().unwrap().contains(message),
        "expected {message:?} in {payload}"
    );

    let list = response_json(
        app.request(Method::GET, "/api/v1/purchase-orders", None)
            .await,
    )
    .await;
    assert!(order_numbers(&list).is_empty());
}

#[tokio::test]
async fn each_mutation_is_logged_once() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new().await;
    let created = app
        .create_order(order_body("PO-1", "Acme Corp", "100.00", "DRAFT", "USD"))
        .await;
    let uri = format!("/api/v1/purchase-orders/{}", created["id"]);
    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(order_body("PO-1", "Acme Corp", "120.00", "SUBMITTED", "USD")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(logs.count("purchase order created"), 1);
    assert_eq!(logs.count("purchase order updated"), 1);
    assert_eq!(logs.count("purchase order deleted"), 1);
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new().await;

    let ok = app
        .request(Method::GET, "/api/v1/purchase-orders", None)
        .await;
    assert!(ok.headers().contains_key("x-request-id"));

    let failed = app
        .request_with_headers(
            Method::GET,
            "/api/v1/purchase-orders/999",
            None,
            &[("x-request-id", "trace-me-1")],
        )
        .await;
    assert_eq!(failed.headers().get("x-request-id").unwrap(), "trace-me-1");
    let body = response_json(failed).await;
    assert_eq!(body["request_id"], "trace-me-1");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn health_endpoints_report_up() {
    let app = TestApp::new().await;

    let live = app.request(Method::GET, "/health", None).await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(response_json(live).await["status"], "up");

    let ready = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(response_json(ready).await["database"], "up");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert!(doc["paths"]["/api/v1/purchase-orders"].is_object());
}

//! Purchase Order API Library
//!
//! CRUD and filtered listing of purchase orders over HTTP, backed by SeaORM.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod queries;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Routes served under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new().nest(
        "/purchase-orders",
        handlers::purchase_orders::purchase_order_routes(),
    )
}

/// Full application router without CORS: health, v1 API, Swagger UI,
/// HTTP tracing and request ids.
pub fn build_router(state: AppState) -> Router {
    let health = health::health_routes(state.db.clone());

    Router::new()
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        .nest("/health", health)
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}

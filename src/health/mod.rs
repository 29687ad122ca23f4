//! Liveness, readiness and version endpoints, mounted under `/health`.
//!
//! Liveness answers as long as the process serves requests; readiness also
//! requires the database to answer a ping.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    /// Only present on readiness reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<HealthStatus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

#[derive(Clone)]
struct HealthState {
    db: Arc<DatabaseConnection>,
    started: Instant,
}

impl HealthState {
    fn report(&self, status: HealthStatus, database: Option<HealthStatus>) -> HealthReport {
        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.started.elapsed().as_secs(),
            database,
        }
    }
}

async fn liveness(State(state): State<HealthState>) -> Json<HealthReport> {
    Json(state.report(HealthStatus::Up, None))
}

async fn readiness(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            warn!(error = %e, "database readiness ping failed");
            HealthStatus::Down
        }
    };
    let code = match database {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(state.report(database, Some(database))))
}

async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `/`, `/live`, `/ready` and `/version`.
pub fn health_routes(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/version", get(version))
        .with_state(HealthState {
            db,
            started: Instant::now(),
        })
}

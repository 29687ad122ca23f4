use crate::config::AppConfig;
use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tracing::{info, warn};

/// How long browsers may cache a preflight response.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
    Method::PATCH,
];

/// Build CORS layer from config
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS ({})",
            if cfg.cors_allow_any_origin {
                "explicit override enabled"
            } else {
                "development environment without configured origins"
            }
        );
        return CorsLayer::permissive().max_age(PREFLIGHT_MAX_AGE);
    }

    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    info!("CORS enabled for {} origin(s)", origins.len());

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cfg.cors_allow_credentials)
        .max_age(PREFLIGHT_MAX_AGE)
}

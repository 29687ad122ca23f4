use crate::errors::ServiceError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Unreadable or mistyped JSON bodies are client errors.
pub fn json_rejection(rejection: JsonRejection) -> ServiceError {
    ServiceError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

pub fn query_rejection(rejection: QueryRejection) -> ServiceError {
    ServiceError::validation(format!(
        "Invalid query parameters: {}",
        rejection.body_text()
    ))
}

pub fn path_rejection(rejection: PathRejection) -> ServiceError {
    ServiceError::validation(format!("Invalid path parameter: {}", rejection.body_text()))
}

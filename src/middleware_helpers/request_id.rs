use crate::tracing::{scope_request_id, RequestId, REQUEST_ID_HEADER};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Client-supplied id when acceptable, otherwise a fresh one.
fn resolve(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_default()
}

fn stamp(headers: &mut HeaderMap, value: &HeaderValue) {
    headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
}

/// Tags the request and its response with an `x-request-id`.
///
/// The id is also stored as a request extension (read by the trace span maker)
/// and kept in task-local scope while the rest of the stack runs, so error
/// bodies can report it.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve(request.headers());
    let header = HeaderValue::from_str(request_id.as_str()).ok();

    if let Some(value) = &header {
        stamp(request.headers_mut(), value);
    }
    request.extensions_mut().insert(request_id.clone());

    let mut response = scope_request_id(request_id, next.run(request)).await;

    if let Some(value) = &header {
        stamp(response.headers_mut(), value);
    }
    response
}

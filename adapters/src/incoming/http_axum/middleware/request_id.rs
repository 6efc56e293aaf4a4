use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Span, field, info_span};
use uuid::Uuid;

use crate::incoming::http_axum::core::extractors::{EXECUTOR_EMAIL_HEADER, EXECUTOR_ROLE_HEADER};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Tags the request with an id (the caller's, or a fresh uuid), runs the rest
/// of the stack inside a span carrying that id and the forwarded executor, and
/// echoes the id on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    let span = info_span!(
        "request",
        request_id = %request_id,
        executor = field::Empty,
        executor_role = field::Empty,
    );
    record_executor(&span, request.headers());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn record_executor(span: &Span, headers: &HeaderMap) {
    if let Some(email) = headers.get(EXECUTOR_EMAIL_HEADER).and_then(|v| v.to_str().ok()) {
        span.record("executor", email);
    }
    if let Some(role) = headers.get(EXECUTOR_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
        span.record("executor_role", role);
    }
}

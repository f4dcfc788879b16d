//! Request ID middleware for request tracing and correlation.
//!
//! The quote service sits behind the back-office reverse proxy, which
//! forwards an `x-request-id` header; when the header is absent (direct
//! calls, probes) a UUID v4 is generated instead. The id is recorded on the
//! request span, tagged on the Sentry scope, and echoed in the response so
//! an operator can quote it when reporting a bad quote.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Take the upstream request id, or mint one.
fn extract_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a unique request ID.
///
/// The id is:
/// 1. Recorded on the current tracing span (`request_id` field)
/// 2. Tagged on the Sentry scope for error correlation
/// 3. Added to the response headers for client visibility
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = extract_request_id(request.headers());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

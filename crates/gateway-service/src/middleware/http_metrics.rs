//! HTTP metrics middleware.
//!
//! Applied as the outermost layer so it also sees framework-level rejections
//! (415 on a wrong Content-Type, 422 on a malformed body, 404 on an unknown
//! route, 405 on an unrouted method).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Record method, normalized path, status and duration of every response.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}

//! # HTTP Metrics Middleware
//!
//! Records one counter and one latency histogram per request through the
//! `metrics` facade. Routes are labelled by their matched template
//! (`/v1/documents/{document_id}`), never by the concrete path, so document
//! ids do not multiply label cardinality.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

pub const HTTP_REQUESTS: &str = "efact_http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "efact_http_request_duration_seconds";

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = route_label(request.extensions().get::<MatchedPath>());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        HTTP_REQUESTS,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION, "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

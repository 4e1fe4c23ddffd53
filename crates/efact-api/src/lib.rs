//! # efact-api — Axum HTTP Service
//!
//! Exposes document processing over HTTP.
//!
//! ## Routes
//!
//! - `GET  /v1/documents`: list stored documents.
//! - `PUT  /v1/documents/{document_id}`: store an unsigned document.
//! - `GET  /v1/documents/{document_id}`: fetch a stored document.
//! - `DELETE /v1/documents/{document_id}`: remove a stored document.
//! - `POST /v1/documents/{document_id}/process`: validate and sign.
//! - `POST /v1/signatures/verify`: verify a document-plus-signature pair.
//! - `GET  /v1/keys/public`: the public key that verifies signatures.
//! - `/health/*`: Kubernetes health probes.
//! - `GET  /metrics`: Prometheus scrape endpoint, when enabled.
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → MetricsMiddleware (when enabled) → body limit → handler
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers. They delegate to `efact-service`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, LogFormat};
pub use error::AppError;
pub use state::AppState;

/// Request body limit: 2 MiB.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the application router.
///
/// Passing a Prometheus handle mounts `/metrics` and records per-request
/// metrics; `None` leaves both out.
pub fn app(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut api = Router::new()
        .merge(routes::documents::router())
        .merge(routes::signatures::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if metrics.is_some() {
        api = api.layer(from_fn(middleware::metrics_middleware));
    }

    let api = api.layer(TraceLayer::new_for_http()).with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if let Some(handle) = metrics {
        probes = probes.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

/// Liveness probe: the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the document store answers.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match state.processor.store().find_by_document_id("") {
        Ok(_) => Ok("ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed: store unavailable");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

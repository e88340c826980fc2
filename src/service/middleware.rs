//! Service middleware for request metrics and correlation.
//!
//! ## Metrics Exposed
//!
//! - `ldp_kernel::metrics` `request` events - path pattern, method, status, latency
//! - `ldp_kernel::access` events - one per request, keyed by request id
//!
//! Metrics are emitted as structured tracing events and aggregated from logs.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use regex_lite::Regex;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Header carrying the request correlation id, in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Metrics middleware that records request counts and latency.
///
/// Records:
/// - Request by path pattern, method, and status code
/// - Request duration in milliseconds
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "ldp_kernel::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Tag each request with a correlation id and log its outcome.
///
/// A caller-supplied `X-Request-Id` is reused, otherwise a v4 UUID is minted.
/// The id scopes every event the handler emits and is echoed on the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);
    let mut response = next.run(request).instrument(span).await;

    info!(
        target: "ldp_kernel::access",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("static pattern")
    })
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Minted record ids are UUIDs; they become `:id`.
pub fn normalize_path(path: &str) -> String {
    uuid_pattern().replace_all(path, ":id").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn tagged_app() -> Router {
        Router::new()
            .route("/bugs", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/bugs")
            .header("X-Request-Id", "req-42")
            .body(Body::empty())
            .unwrap();
        let response = tagged_app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn test_request_id_is_minted() {
        let request = Request::builder().uri("/bugs").body(Body::empty()).unwrap();
        let response = tagged_app().oneshot(request).await.unwrap();
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_normalize_path_replaces_record_id() {
        let path = "/bugs/550e8400-e29b-41d4-a716-446655440000/compact";
        assert_eq!(normalize_path(path), "/bugs/:id/compact");
    }

    #[test]
    fn test_normalize_path_preserves_regular_path() {
        assert_eq!(normalize_path("/bugs/creationDialog"), "/bugs/creationDialog");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }
}

//! Prometheus metrics for the file-store service.
//!
//! Lifecycle counters live in `filestore_registry::metrics`; this module adds
//! request-level counters and owns the registry they are all exposed from.
//!
//! The `/metrics` endpoint is unauthenticated. Counters carry no tenant or
//! store identifiers, but the endpoint should still only be reachable by the
//! scraper.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static API_ERRORS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("filestore_api_errors_total", "Total API errors by error code"),
        &["code"],
    )
    .expect("metric creation failed")
});

pub static INVOKE_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "filestore_invoke_requests_total",
            "Internal invoke requests by method and resulting status",
        ),
        &["method", "status"],
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent, so tests may build many routers.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(API_ERRORS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(INVOKE_REQUESTS.clone()))
            .expect("metric registration failed");
        for collector in filestore_registry::metrics::collectors() {
            REGISTRY
                .register(collector)
                .expect("metric registration failed");
        }
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

pub fn record_api_error(code: &str) {
    API_ERRORS.with_label_values(&[code]).inc();
}

pub fn record_invoke(method: &str, status: u16) {
    let status = status.to_string();
    INVOKE_REQUESTS
        .with_label_values(&[method, status.as_str()])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        register_metrics();
        register_metrics();
        record_api_error("forbidden_access");
        assert!(
            REGISTRY
                .gather()
                .iter()
                .any(|family| family.get_name() == "filestore_api_errors_total")
        );
    }
}

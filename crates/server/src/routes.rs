//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health check (unauthenticated for load balancers and probes)
        .route("/v1/health", get(handlers::health_check))
        .route(
            "/v1/file-stores",
            post(handlers::create_file_store).get(handlers::list_file_stores),
        )
        .route(
            "/v1/file-stores/{id}",
            get(handlers::get_file_store)
                .patch(handlers::update_file_store)
                .delete(handlers::delete_file_store),
        )
        .route(
            "/v1/buckets/{bucket}/file-stores",
            get(handlers::list_bucket_file_stores),
        )
        .route("/internal/v1/invoke", post(handlers::invoke));

    let mut router = Router::new().merge(api_routes);

    // When enabled, this endpoint should be network-restricted to the scraper.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router
        .layer(middleware::from_fn(auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

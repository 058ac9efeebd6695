//! Axum router configuration with middleware.
//!
//! Route groups are mounted per `service.components`:
//! - `common`: `/health`, `/info`
//! - `grades`: `/api/v1/auth/*`, `/api/v1/grades/*`
//!
//! Middleware: CORS, tracing.

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gradebook_types::config::ServiceConfig;

use crate::http::handlers;
use crate::http::handlers::health::ServiceInfo;
use crate::state::AppState;

/// Build the router for the component groups `service` enables.
pub fn build_router(state: AppState, service: &ServiceConfig, info: ServiceInfo) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new();
    let mut router = Router::new();

    if service.has_component("common") {
        router = router
            .route("/health", get(handlers::health::health))
            .route("/info", get(handlers::health::info));
    }

    if service.has_component("grades") {
        api_routes = api_routes
            .route("/auth/login", post(handlers::auth::login))
            .route("/auth/logout", post(handlers::auth::logout))
            .route(
                "/grades/student/{sid}",
                get(handlers::grade::transcript),
            )
            .route(
                "/grades/student/{sid}/course/{cid}",
                put(handlers::grade::enter_scores),
            )
            .route("/grades/class/{tcid}", get(handlers::grade::class_table))
            .route(
                "/grades/class/{tcid}/distribution",
                get(handlers::grade::class_distribution),
            );
    }

    tracing::debug!(components = ?service.components, "router built");

    router
        .nest("/api/v1", api_routes)
        .layer(Extension(info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

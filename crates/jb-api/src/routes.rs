//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::applications::{
    apply_to_job, list_my_applications, update_application_status,
};
use crate::handlers::companies::list_companies;
use crate::handlers::jobs::{
    create_job, delete_job, get_job, list_jobs, list_my_jobs, list_saved_jobs, save_job,
    unsave_job, update_hiring_status,
};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let job_routes = Router::new()
        // Board listing and recruiter views
        .route("/jobs", get(list_jobs))
        .route("/jobs", post(create_job))
        .route("/jobs/saved", get(list_saved_jobs))
        .route("/jobs/mine", get(list_my_jobs))
        // Single job operations
        .route("/jobs/:job_id", get(get_job))
        .route("/jobs/:job_id", delete(delete_job))
        .route("/jobs/:job_id/hiring-status", patch(update_hiring_status))
        // Bookmarks
        .route("/jobs/:job_id/save", post(save_job))
        .route("/jobs/:job_id/save", delete(unsave_job))
        // Applying
        .route("/jobs/:job_id/apply", post(apply_to_job));

    let application_routes = Router::new()
        .route("/applications", get(list_my_applications))
        .route(
            "/applications/:application_id/status",
            patch(update_application_status),
        );

    let company_routes = Router::new().route("/companies", get(list_companies));

    // Rate limiter shared across the API surface
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(job_routes)
        .merge(application_routes)
        .merge(company_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

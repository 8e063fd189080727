use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, get_service, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::middleware::{request_metrics::count_failures_middleware, security_headers::security_headers_middleware};
use crate::routes::{exercises, health, users};
use crate::state::AppState;

const BODY_LIMIT: usize = 1024 * 1024;

/// Resolves a bundled asset path: next to the binary first, then the crate root.
pub fn asset_path(relative: &str) -> PathBuf {
    let runtime = std::env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.join(relative)));
    match runtime {
        Some(path) if path.exists() => path,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative),
    }
}

/// Builds the complete application router: API, operational endpoints,
/// landing page and static assets, wrapped in the shared layers.
pub fn build_router(state: AppState) -> Router {
    let landing_page = get_service(ServeFile::new(asset_path("views/index.html")));
    let static_assets = ServeDir::new(asset_path("public"));

    let cfg = state.config.clone();
    let metrics = state.metrics.clone();

    Router::new()
        .route("/", landing_page)
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route("/api/users/{id}/exercises", post(exercises::create_exercise))
        .route("/api/users/{id}/logs", get(exercises::get_log))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .fallback_service(static_assets)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(from_fn_with_state(metrics, count_failures_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, security_headers_middleware))
        .layer(CorsLayer::permissive())
}

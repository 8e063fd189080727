use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Liveness probe - no I/O
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: checks storage with timeout protection
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::time::timeout(std::time::Duration::from_secs(5), state.store.ping()).await {
        Ok(Ok(())) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP exercise_tracker_users_created Users created\n# TYPE exercise_tracker_users_created counter\nexercise_tracker_users_created {}\n\
# HELP exercise_tracker_exercises_logged Exercises logged\n# TYPE exercise_tracker_exercises_logged counter\nexercise_tracker_exercises_logged {}\n\
# HELP exercise_tracker_log_queries Exercise log queries served\n# TYPE exercise_tracker_log_queries counter\nexercise_tracker_log_queries {}\n\
# HELP exercise_tracker_failed_requests Requests answered with a server error\n# TYPE exercise_tracker_failed_requests counter\nexercise_tracker_failed_requests {}\n\
# HELP exercise_tracker_uptime_seconds Uptime seconds\n# TYPE exercise_tracker_uptime_seconds gauge\nexercise_tracker_uptime_seconds {}\n",
        m.users_created, m.exercises_logged, m.log_queries, m.failed_requests, m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}

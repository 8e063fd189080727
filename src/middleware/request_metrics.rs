use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::Metrics;

/// Counts responses with a 5xx status in [`Metrics::failed_requests`].
pub async fn count_failures_middleware(State(metrics): State<Metrics>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    if res.status().is_server_error() {
        metrics.inc_failed_requests();
        tracing::warn!(%method, %path, status = res.status().as_u16(), "request failed");
    }
    res
}

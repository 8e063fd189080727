//! Integration and unit tests for the exercise tracker.
//!
//! ## Test Modules
//!
//! - **api_tests**: the user, exercise and log endpoints through the full router
//! - **store_tests**: the SQLite persistence service
//! - **error_tests**: error rendering and validation helpers
//! - **config_tests**: configuration loading and validation
//! - **health_api_tests**: operational endpoints and response headers
//!
//! Run a single module with e.g. `cargo test api_tests`.


use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{app, config::AppConfig, state::AppState, store::SqliteStore};

/// A router over a fresh SQLite database in a temporary directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<SqliteStore>,
    _dir: TempDir,
}

pub fn test_config(dir: &TempDir, strict: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = format!("sqlite://{}", dir.path().join("test.db").display());
    config.database.max_connections = 2;
    config.api.strict_validation = strict;
    config
}

pub async fn setup_test_app(strict: bool) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, strict);
    let store = Arc::new(SqliteStore::connect(&config.database).await.unwrap());
    let state = AppState::new(store.clone(), config);
    let router = app::build_router(state.clone());
    TestApp { router, state, store, _dir: dir }
}

/// Sends a request through `router`; the body is parsed as JSON when possible.
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, req).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, req).await
    }

    /// Creates a user and returns its id.
    pub async fn create_user(&self, username: &str) -> String {
        let (status, json) = self.post_json("/api/users", serde_json::json!({ "username": username })).await;
        assert_eq!(status, StatusCode::OK, "create user failed: {}", json);
        json["id"].as_str().unwrap().to_string()
    }

    pub async fn add_exercise(&self, user_id: &str, body: Value) -> (StatusCode, Value) {
        self.post_json(&format!("/api/users/{}/exercises", user_id), body).await
    }
}

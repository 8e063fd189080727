//! # Exercise Tracker Backend Library
//!
//! A small HTTP API that records users and the exercises they log, and
//! answers filtered exercise-log queries.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **SQLx**: asynchronous SQLite persistence
//! - **Tokio**: async runtime
//! - **Serde**: JSON and form payloads
//!
//! ## Core Components
//!
//! - [`app`]: router assembly and static assets
//! - [`config`]: layered configuration (defaults, TOML files, environment)
//! - [`dates`]: parsing of client dates and calendar formatting
//! - [`error`]: the error type every handler returns and its JSON rendering
//! - [`extract`]: JSON-or-form request body extractor
//! - [`logs`]: translation of log query parameters into a storage predicate
//! - [`metrics`]: request counters
//! - [`middleware`]: security headers and failure accounting
//! - [`routes`]: HTTP endpoint handlers
//! - [`state`]: shared application state
//! - [`store`]: the persistence service and its SQLite implementation
//! - [`types`]: request and response DTOs

pub mod app;
pub mod config;
pub mod dates;
pub mod error;
pub mod extract;
pub mod logs;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

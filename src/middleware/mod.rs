//! Middleware components for HTTP request processing.
//!
//! Cross-cutting concerns layered around every route: response hardening
//! headers and failure accounting.

pub mod request_metrics;
pub mod security_headers;

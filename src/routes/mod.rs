//! HTTP route handlers for the exercise tracker API.
//!
//! - `users`: create and list users
//! - `exercises`: log an exercise for a user and read back the filtered log
//! - `health`: liveness, readiness, metrics and version endpoints

pub mod exercises;
pub mod health;
pub mod users;

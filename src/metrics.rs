use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub users_created: Arc<AtomicU64>,
    pub exercises_logged: Arc<AtomicU64>,
    pub log_queries: Arc<AtomicU64>,
    pub failed_requests: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            users_created: Arc::new(AtomicU64::new(0)),
            exercises_logged: Arc::new(AtomicU64::new(0)),
            log_queries: Arc::new(AtomicU64::new(0)),
            failed_requests: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_users_created(&self) {
        self.users_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_exercises_logged(&self) {
        self.exercises_logged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_log_queries(&self) {
        self.log_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_requests(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            users_created: self.users_created.load(Ordering::Relaxed),
            exercises_logged: self.exercises_logged.load(Ordering::Relaxed),
            log_queries: self.log_queries.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub users_created: u64,
    pub exercises_logged: u64,
    pub log_queries: u64,
    pub failed_requests: u64,
    pub uptime_seconds: u64,
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::store::ExerciseStore;

/// The shared application state.
///
/// Cloned into every handler by Axum's `State` extractor. Nothing in here is
/// mutable apart from the atomic metric counters; consistency of the data is
/// left to the store.
#[derive(Clone)]
pub struct AppState {
    /// The persistence service.
    ///
    /// Constructed once at startup and closed on shutdown by `main`.
    pub store: Arc<dyn ExerciseStore>,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Request counters exposed on `/metrics`.
    pub metrics: Metrics,
}

impl AppState {
    /// Creates a new `AppState` around an already connected store.
    pub fn new(store: Arc<dyn ExerciseStore>, config: AppConfig) -> Self {
        Self { store, config: Arc::new(config), metrics: Metrics::new() }
    }

    /// Whether handlers validate input themselves instead of leaving it to storage.
    pub fn strict(&self) -> bool {
        self.config.api.strict_validation
    }
}

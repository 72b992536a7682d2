//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::replication::StatusSource;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the read-only configuration and the source of replica status.
/// Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn StatusSource>,
}

impl AppState {
    /// Creates a new application state from the given configuration and status source.
    pub fn new(config: AppConfig, source: Arc<dyn StatusSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}

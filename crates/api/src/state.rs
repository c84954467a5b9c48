use std::sync::Arc;

use genq_core::history::QueueVersion;
use genq_core::store::JobStore;

use crate::config::ServerConfig;
use crate::forms::FormRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The job store, constructed once at startup.
    pub jobs: Arc<dyn JobStore>,
    /// Open form sessions.
    pub forms: Arc<FormRegistry>,
    /// Bumped after every successful submission; drives history reloads.
    pub queue_version: Arc<QueueVersion>,
}

impl AppState {
    pub fn new(config: ServerConfig, jobs: Arc<dyn JobStore>) -> Self {
        Self {
            config: Arc::new(config),
            jobs,
            forms: Arc::new(FormRegistry::new()),
            queue_version: Arc::new(QueueVersion::new()),
        }
    }
}

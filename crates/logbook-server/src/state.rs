use crate::config::AppConfig;
use logbook_core::FileRegistry;
use std::sync::Arc;

/// Shared application state (thread-safe).
///
/// The registry is constructed once at boot and injected into handlers
/// through axum's `State` extractor; nothing in the process reaches it
/// through a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<FileRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig, registry: FileRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}

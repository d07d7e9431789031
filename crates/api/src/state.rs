use std::sync::Arc;

use crate::config::ServerConfig;
use crate::gateway::BackendForwarder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (mock flag, backend origin).
    pub config: Arc<ServerConfig>,
    /// Streaming forwarder to the backend origin.
    pub forwarder: Arc<BackendForwarder>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let forwarder = BackendForwarder::new(config.backend_url.clone());
        Self {
            config: Arc::new(config),
            forwarder: Arc::new(forwarder),
        }
    }
}

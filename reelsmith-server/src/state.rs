//! Application state.

use std::sync::Arc;

use reelsmith::Pipeline;

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server settings.
    pub config: ServerConfig,
    /// Synthesis pipeline shared by every request.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Bundle `pipeline` with `config`.
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}

//! Shared application state for the Axum API server.

use std::sync::Arc;

use treasury_common::config::AppConfig;
use treasury_render::RendererRegistry;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub renderers: Arc<RendererRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let renderers = Arc::new(RendererRegistry::new(&config, false));
        Self { config, renderers }
    }
}

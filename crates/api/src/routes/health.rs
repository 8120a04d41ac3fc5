//! Liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health: Service identity plus whether card logos can be found.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let assets_available = state.config.assets_dir.is_dir();
    Json(json!({
        "status": "ok",
        "service": "treasury-api",
        "version": env!("CARGO_PKG_VERSION"),
        "assets_available": assets_available,
    }))
}

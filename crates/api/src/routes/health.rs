use std::path::Path;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the static asset directory exists.
    pub static_assets: bool,
}

/// GET /health -- returns service health.
///
/// The API itself has no dependencies, so the only degraded state is a
/// missing static directory (the client bundle and placeholder image 404).
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let static_assets = Path::new(&state.config.static_dir).is_dir();

    let status = if static_assets { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        static_assets,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

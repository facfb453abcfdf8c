use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::provider::LoadState;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` once both collections are loaded without error, else `degraded`.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub artworks: LoadState,
    pub blogs: LoadState,
}

/// GET /health -- returns service health and the provider's load state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.provider.snapshot();
    let healthy = snapshot.error.is_none()
        && snapshot.artworks_state.is_loaded()
        && snapshot.blogs_state.is_loaded();

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        artworks: snapshot.artworks_state,
        blogs: snapshot.blogs_state,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

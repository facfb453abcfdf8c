//! Admin cache control.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Only keys starting with this prefix; everything when absent.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// POST /api/v1/admin/cache/invalidate
pub async fn invalidate_cache(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<InvalidateRequest>,
) -> StatusCode {
    state.catalog.invalidate_cache(input.prefix.as_deref());
    StatusCode::NO_CONTENT
}

//! Handler for `POST /auth/login`.

use axum::extract::State;
use axum::Json;
use hearts_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::provider::Session;
use crate::auth::ROLE_ADMIN;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AdminInfo,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Check the admin credential and issue an access token. Any other address
/// is rejected with the same message as a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = match state.auth.sign_in_admin(&input.email, &input.password).await? {
        Session::Admin { email } => email,
        Session::Anonymous { .. } => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Admin sign-in required".into(),
            )))
        }
    };

    let access_token = generate_access_token(&email, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(email = %email, "Admin signed in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: AdminInfo {
            email,
            role: ROLE_ADMIN.to_string(),
        },
    }))
}

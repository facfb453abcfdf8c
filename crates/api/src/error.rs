use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearts_core::error::CoreError;
use hearts_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for the data
/// layer. Implements [`IntoResponse`] to produce `{"error", "code"}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(StoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    /// Domain errors raised inside the store layer keep their own mapping.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => AppError::Core(core),
            other => AppError::Store(other),
        }
    }
}

fn internal(message: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %message, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Map a store error onto a status, error code and client-facing message.
///
/// - Timeouts map to 504; the write may still land remotely.
/// - Missing documents map to 404.
/// - Backend rejections map to 502.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Timeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "TIMEOUT",
            "The content store did not respond in time".to_string(),
        ),
        StoreError::NotFound { id, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Document {id} not found"),
        ),
        StoreError::Rejected(msg) | StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "Store rejected request");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_ERROR",
                "The content store rejected the request".to_string(),
            )
        }
        StoreError::Core(core) => classify_core(core),
        other => internal(&other.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core(core),
            AppError::Store(err) => classify_store(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

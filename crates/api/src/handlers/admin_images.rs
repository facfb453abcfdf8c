//! Admin image uploads.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use hearts_core::image_url::FOLDER_ARTWORKS;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// `artworks` (default) or `blogs`.
    pub folder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/v1/admin/images?folder=artworks
///
/// Accepts multipart form data with a `file` field and returns the public
/// URL of the stored image.
pub async fn upload_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadResponse>>> {
    let folder = params.folder.as_deref().unwrap_or(FOLDER_ARTWORKS);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let url = state
            .catalog
            .images
            .upload_image_with_retry(folder, &file_name, bytes.to_vec(), &content_type)
            .await?;
        return Ok(Json(DataResponse {
            data: UploadResponse { url },
        }));
    }

    Err(AppError::BadRequest("Missing 'file' field".into()))
}

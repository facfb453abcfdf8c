//! Admin handlers for the `artworks` collection.
//!
//! Every successful write re-syncs the data provider so public pages see it
//! on their next read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hearts_core::error::CoreError;
use hearts_core::optimistic::optimistic;
use hearts_db::models::{Artwork, ArtworkFilter, ArtworkPatch, ImageSource, NewArtwork};

use crate::content::ContentView;
use crate::error::{AppError, AppResult};
use crate::handlers::DeletedResponse;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_or_404(state: &AppState, id: &str) -> AppResult<Artwork> {
    state
        .catalog
        .artworks
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Artwork",
                id: id.to_string(),
            })
        })
}

/// Flip one flag on the shared list first, then write it. The shared list
/// is put back if the write fails.
async fn toggle(
    state: &AppState,
    id: &str,
    read: fn(&Artwork) -> bool,
    write: fn(&mut Artwork, bool),
    patch: fn(bool) -> ArtworkPatch,
) -> AppResult<Artwork> {
    let current = read(&find_or_404(state, id).await?);
    let next = !current;
    let provider = &state.provider;

    optimistic(
        || {
            provider.edit_artwork(id, |a| write(a, next));
        },
        state.catalog.artworks.update(id, patch(next)),
        || {
            provider.edit_artwork(id, |a| write(a, current));
        },
    )
    .await?;

    state.provider.sync_artworks().await;
    find_or_404(state, id).await
}

/// GET /api/v1/admin/artworks
pub async fn list_artworks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<ContentView<Vec<Artwork>>> {
    Json(state.content.artworks(ArtworkFilter::default()).await)
}

/// POST /api/v1/admin/artworks
pub async fn create_artwork(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewArtwork>,
) -> AppResult<(StatusCode, Json<DataResponse<Artwork>>)> {
    let artwork = state.catalog.artworks.add(input).await?;
    state.provider.sync_artworks().await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: artwork })))
}

/// PUT /api/v1/admin/artworks/{id}
pub async fn update_artwork(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ArtworkPatch>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    state.catalog.artworks.update(&id, patch).await?;
    state.provider.sync_artworks().await;
    let artwork = find_or_404(&state, &id).await?;
    Ok(Json(DataResponse { data: artwork }))
}

/// DELETE /api/v1/admin/artworks/{id}
///
/// Uploaded images are removed from the bucket after the record goes.
pub async fn delete_artwork(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let artwork = find_or_404(&state, &id).await?;
    state.catalog.artworks.delete(&id).await?;
    if artwork.image_source == ImageSource::Upload && !artwork.image.is_empty() {
        state.catalog.images.delete_image(&artwork.image).await;
    }
    state.provider.sync_artworks().await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/artworks/{id}/toggle-published
pub async fn toggle_published(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    let artwork = toggle(
        &state,
        &id,
        |a| a.published,
        |a, v| a.published = v,
        ArtworkPatch::published,
    )
    .await?;
    Ok(Json(DataResponse { data: artwork }))
}

/// POST /api/v1/admin/artworks/{id}/toggle-available
pub async fn toggle_available(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    let artwork = toggle(
        &state,
        &id,
        |a| a.is_available,
        |a, v| a.is_available = v,
        ArtworkPatch::available,
    )
    .await?;
    Ok(Json(DataResponse { data: artwork }))
}

/// DELETE /api/v1/admin/artworks
pub async fn delete_all_artworks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    let deleted = state.catalog.artworks.delete_all().await?;
    state.provider.sync_artworks().await;
    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}

/// POST /api/v1/admin/artworks/refresh
///
/// Re-read the collection from the store, bypassing the cache.
pub async fn refresh_artworks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Artwork>>>> {
    let artworks = state
        .catalog
        .artworks
        .get_from_server(&ArtworkFilter::default())
        .await?;
    state.provider.set_artworks(artworks.clone());
    Ok(Json(DataResponse { data: artworks }))
}

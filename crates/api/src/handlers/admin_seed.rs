//! Admin seeding of the starting artwork catalogue.

use axum::extract::State;
use axum::Json;
use hearts_db::models::NewArtwork;
use hearts_db::repositories::{SeedItem, SeedReport};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::DeletedResponse;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const SEED_ARTWORKS: &str = include_str!("../../seed/artworks.json");

/// The artworks shipped with the site.
pub fn seed_catalogue() -> AppResult<Vec<NewArtwork>> {
    serde_json::from_str(SEED_ARTWORKS)
        .map_err(|e| AppError::InternalError(format!("Seed catalogue is malformed: {e}")))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedRequest {
    /// Rewrite artworks whose slug already exists.
    #[serde(default)]
    pub overwrite: bool,
}

/// GET /api/v1/admin/seed
pub async fn seed_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SeedItem>>>> {
    let items = seed_catalogue()?;
    let status = state.catalog.artworks.seed_status(&items).await?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/admin/seed
pub async fn run_seed(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SeedRequest>,
) -> AppResult<Json<DataResponse<SeedReport>>> {
    let items = seed_catalogue()?;
    let report = state.catalog.artworks.seed(items, input.overwrite).await?;
    state.provider.sync_artworks().await;
    Ok(Json(DataResponse { data: report }))
}

/// DELETE /api/v1/admin/seed
///
/// Clears every artwork, seeded or not.
pub async fn clear_seed(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    let deleted = state.catalog.artworks.delete_all().await?;
    state.provider.sync_artworks().await;
    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}

#[cfg(test)]
mod tests {
    use hearts_db::models::Symbolism;

    use super::*;

    #[test]
    fn catalogue_parses() {
        let items = seed_catalogue().unwrap();
        let titles: Vec<_> = items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            ["A Moment Between Worlds", "Nandi painting", "Pichwai painting"]
        );
        assert_eq!(items[1].vastu_placement.len(), 4);
        assert_eq!(
            items[2].symbolism[1],
            Symbolism {
                label: "Lotus flowers".into(),
                text: "Purity, spiritual awakening, and divine beauty".into(),
            }
        );
    }
}

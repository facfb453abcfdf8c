//! Admin dashboard counts.

use axum::extract::State;
use axum::Json;
use hearts_db::models::{ArtworkFilter, BlogFilter};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub artworks: usize,
    pub published_artworks: usize,
    pub available_artworks: usize,
    pub blogs: usize,
    pub published_blogs: usize,
}

/// GET /api/v1/admin/dashboard
pub async fn get_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let all_artworks = ArtworkFilter::default();
    let all_blogs = BlogFilter::default();
    let (artworks, blogs) = tokio::try_join!(
        state.catalog.artworks.get(&all_artworks),
        state.catalog.blogs.get(&all_blogs),
    )?;

    let stats = DashboardStats {
        artworks: artworks.len(),
        published_artworks: artworks.iter().filter(|a| a.published).count(),
        available_artworks: artworks
            .iter()
            .filter(|a| a.published && a.is_available)
            .count(),
        blogs: blogs.len(),
        published_blogs: blogs.iter().filter(|b| b.published).count(),
    };
    Ok(Json(DataResponse { data: stats }))
}

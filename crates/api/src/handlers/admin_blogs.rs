//! Admin handlers for the `blogs` collection.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hearts_core::error::CoreError;
use hearts_core::optimistic::optimistic;
use hearts_db::models::{Blog, BlogFilter, BlogPatch, ImageSource, NewBlog};

use crate::content::ContentView;
use crate::error::{AppError, AppResult};
use crate::handlers::DeletedResponse;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_or_404(state: &AppState, id: &str) -> AppResult<Blog> {
    state.catalog.blogs.find_by_id(id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Blog",
            id: id.to_string(),
        })
    })
}

/// GET /api/v1/admin/blogs
pub async fn list_blogs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<ContentView<Vec<Blog>>> {
    Json(state.content.blogs(BlogFilter::default()).await)
}

/// POST /api/v1/admin/blogs
pub async fn create_blog(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewBlog>,
) -> AppResult<(StatusCode, Json<DataResponse<Blog>>)> {
    let blog = state.catalog.blogs.add(input).await?;
    state.provider.sync_blogs().await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: blog })))
}

/// PUT /api/v1/admin/blogs/{id}
pub async fn update_blog(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BlogPatch>,
) -> AppResult<Json<DataResponse<Blog>>> {
    state.catalog.blogs.update(&id, patch).await?;
    state.provider.sync_blogs().await;
    let blog = find_or_404(&state, &id).await?;
    Ok(Json(DataResponse { data: blog }))
}

/// DELETE /api/v1/admin/blogs/{id}
pub async fn delete_blog(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let blog = find_or_404(&state, &id).await?;
    state.catalog.blogs.delete(&id).await?;
    if blog.image_source == ImageSource::Upload && !blog.image.is_empty() {
        state.catalog.images.delete_image(&blog.image).await;
    }
    state.provider.sync_blogs().await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/blogs/{id}/toggle-published
pub async fn toggle_published(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Blog>>> {
    let current = find_or_404(&state, &id).await?.published;
    let next = !current;
    let provider = &state.provider;

    optimistic(
        || {
            provider.edit_blog(&id, |b| b.published = next);
        },
        state.catalog.blogs.update(&id, BlogPatch::published(next)),
        || {
            provider.edit_blog(&id, |b| b.published = current);
        },
    )
    .await?;

    state.provider.sync_blogs().await;
    let blog = find_or_404(&state, &id).await?;
    Ok(Json(DataResponse { data: blog }))
}

/// DELETE /api/v1/admin/blogs
pub async fn delete_all_blogs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    let deleted = state.catalog.blogs.delete_all().await?;
    state.provider.sync_blogs().await;
    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}

/// POST /api/v1/admin/blogs/refresh
pub async fn refresh_blogs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Blog>>>> {
    let blogs = state
        .catalog
        .blogs
        .get_from_server(&BlogFilter::default())
        .await?;
    state.provider.set_blogs(blogs.clone());
    Ok(Json(DataResponse { data: blogs }))
}

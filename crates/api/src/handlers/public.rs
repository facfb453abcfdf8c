//! Public read handlers. They read through the route tree's content source
//! and only ever expose published records.

use axum::extract::{Path, Query, State};
use axum::Json;
use hearts_core::content::{paragraphs, reading_time_label};
use hearts_core::error::CoreError;
use hearts_db::models::{
    find_collection, summarize_collections, Artwork, ArtworkFilter, Blog, BlogFilter,
    CollectionDetail, CollectionSummary,
};
use serde::{Deserialize, Serialize};

use crate::content::ContentView;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ArtworkListParams {
    /// Narrow to artworks still for sale.
    #[serde(default)]
    pub available: bool,
}

/// A blog post with its derived reading aids.
#[derive(Debug, Serialize)]
pub struct BlogPage {
    #[serde(flatten)]
    pub blog: Blog,
    pub reading_time: String,
    pub paragraphs: Vec<String>,
}

impl From<Blog> for BlogPage {
    fn from(blog: Blog) -> Self {
        Self {
            reading_time: reading_time_label(&blog.content),
            paragraphs: paragraphs(&blog.content),
            blog,
        }
    }
}

fn not_found(entity: &'static str, slug: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity,
        id: slug.to_string(),
    })
}

/// Keep a lookup only if it is published. A settled view that found nothing
/// is a 404; a loading or failed one is returned as-is.
fn published_or_404<T>(
    view: ContentView<Option<T>>,
    is_published: impl Fn(&T) -> bool,
    entity: &'static str,
    slug: &str,
) -> AppResult<ContentView<Option<T>>> {
    let view = view.map(|found| found.filter(|r| is_published(r)));
    if view.settled() && view.data.is_none() {
        return Err(not_found(entity, slug));
    }
    Ok(view)
}

/// GET /api/v1/artworks?available=true
pub async fn list_artworks(
    State(state): State<AppState>,
    Query(params): Query<ArtworkListParams>,
) -> Json<ContentView<Vec<Artwork>>> {
    Json(
        state
            .content
            .artworks(ArtworkFilter::public(params.available))
            .await,
    )
}

/// GET /api/v1/available-works
pub async fn available_works(State(state): State<AppState>) -> Json<ContentView<Vec<Artwork>>> {
    Json(state.content.artworks(ArtworkFilter::public(true)).await)
}

/// GET /api/v1/artworks/{slug}
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ContentView<Option<Artwork>>>> {
    let view = state.content.artwork_by_slug(&slug).await;
    published_or_404(view, |a| a.published, "Artwork", &slug).map(Json)
}

/// GET /api/v1/collections
pub async fn list_collections(
    State(state): State<AppState>,
) -> Json<ContentView<Vec<CollectionSummary>>> {
    let view = state.content.artworks(ArtworkFilter::public(false)).await;
    Json(view.map(|artworks| summarize_collections(&artworks)))
}

/// GET /api/v1/collections/{slug}
pub async fn get_collection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ContentView<Option<CollectionDetail>>>> {
    let view = state.content.artworks(ArtworkFilter::public(false)).await;
    let mut view = view.map(|artworks| find_collection(&artworks, &slug));
    view.notice = None;
    if view.settled() && view.data.is_none() {
        return Err(not_found("Collection", &slug));
    }
    Ok(Json(view))
}

/// GET /api/v1/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Json<ContentView<Vec<Blog>>> {
    Json(state.content.blogs(BlogFilter::published()).await)
}

/// GET /api/v1/blogs/{slug}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ContentView<Option<BlogPage>>>> {
    let view = state.content.blog_by_slug(&slug).await;
    let view = published_or_404(view, |b| b.published, "Blog", &slug)?;
    Ok(Json(view.map(|found| found.map(BlogPage::from))))
}

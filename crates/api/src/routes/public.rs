//! Public read routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// ```text
/// GET /artworks              -> list_artworks (?available=true)
/// GET /artworks/{slug}       -> get_artwork
/// GET /available-works       -> available_works
/// GET /collections           -> list_collections
/// GET /collections/{slug}    -> get_collection
/// GET /blogs                 -> list_blogs
/// GET /blogs/{slug}          -> get_blog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artworks", get(public::list_artworks))
        .route("/artworks/{slug}", get(public::get_artwork))
        .route("/available-works", get(public::available_works))
        .route("/collections", get(public::list_collections))
        .route("/collections/{slug}", get(public::get_collection))
        .route("/blogs", get(public::list_blogs))
        .route("/blogs/{slug}", get(public::get_blog))
}

//! Admin routes. Every handler requires the `admin` role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_artworks, admin_blogs, admin_images, admin_seed, cache, dashboard};
use crate::state::AppState;

/// ```text
/// GET    /dashboard                          -> get_dashboard
///
/// GET    /artworks                           -> list_artworks
/// POST   /artworks                           -> create_artwork
/// DELETE /artworks                           -> delete_all_artworks
/// POST   /artworks/refresh                   -> refresh_artworks
/// PUT    /artworks/{id}                      -> update_artwork
/// DELETE /artworks/{id}                      -> delete_artwork
/// POST   /artworks/{id}/toggle-published     -> toggle_published
/// POST   /artworks/{id}/toggle-available     -> toggle_available
///
/// GET    /blogs                              -> list_blogs
/// POST   /blogs                              -> create_blog
/// DELETE /blogs                              -> delete_all_blogs
/// POST   /blogs/refresh                      -> refresh_blogs
/// PUT    /blogs/{id}                         -> update_blog
/// DELETE /blogs/{id}                         -> delete_blog
/// POST   /blogs/{id}/toggle-published        -> toggle_published
///
/// GET    /seed                               -> seed_status
/// POST   /seed                               -> run_seed
/// DELETE /seed                               -> clear_seed
///
/// POST   /images?folder=artworks|blogs       -> upload_image
/// POST   /cache/invalidate                   -> invalidate_cache
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route(
            "/artworks",
            get(admin_artworks::list_artworks)
                .post(admin_artworks::create_artwork)
                .delete(admin_artworks::delete_all_artworks),
        )
        .route("/artworks/refresh", post(admin_artworks::refresh_artworks))
        .route(
            "/artworks/{id}",
            put(admin_artworks::update_artwork).delete(admin_artworks::delete_artwork),
        )
        .route(
            "/artworks/{id}/toggle-published",
            post(admin_artworks::toggle_published),
        )
        .route(
            "/artworks/{id}/toggle-available",
            post(admin_artworks::toggle_available),
        )
        .route(
            "/blogs",
            get(admin_blogs::list_blogs)
                .post(admin_blogs::create_blog)
                .delete(admin_blogs::delete_all_blogs),
        )
        .route("/blogs/refresh", post(admin_blogs::refresh_blogs))
        .route(
            "/blogs/{id}",
            put(admin_blogs::update_blog).delete(admin_blogs::delete_blog),
        )
        .route(
            "/blogs/{id}/toggle-published",
            post(admin_blogs::toggle_published),
        )
        .route(
            "/seed",
            get(admin_seed::seed_status)
                .post(admin_seed::run_seed)
                .delete(admin_seed::clear_seed),
        )
        .route("/images", post(admin_images::upload_image))
        .route("/cache/invalidate", post(cache::invalidate_cache))
}

pub mod admin;
pub mod health;
pub mod public;

use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::content::{SharedContent, StandaloneContent};
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// The public tree reads through [`SharedContent`] (the data provider's
/// snapshot) and the admin tree through [`StandaloneContent`] (the cached
/// repositories). Each subtree gets its own state, so the returned router
/// needs none.
///
/// ```text
/// /auth/login                          login (public)
///
/// /artworks, /artworks/{slug}          published artworks
/// /available-works                     published and for sale
/// /collections, /collections/{slug}    derived from artwork collections
/// /blogs, /blogs/{slug}                published posts
///
/// /admin/...                           see routes::admin (admin only)
/// ```
pub fn api_routes(state: &AppState) -> Router {
    let shared = state.with_content(Arc::new(SharedContent::new(Arc::clone(&state.provider))));
    let standalone = state.with_content(Arc::new(StandaloneContent::new(state.catalog.clone())));

    let public_tree = public::router()
        .route("/auth/login", post(handlers::auth::login))
        .with_state(shared);

    let admin_tree = Router::new()
        .nest("/admin", admin::router())
        .with_state(standalone);

    public_tree.merge(admin_tree)
}

use std::sync::Arc;

use hearts_db::Catalog;

use crate::auth::provider::AuthProvider;
use crate::config::ServerConfig;
use crate::content::ContentSource;
use crate::provider::DataProvider;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Cached repositories and the image service.
    pub catalog: Catalog,
    /// Shared artwork and blog lists for public pages.
    pub provider: Arc<DataProvider>,
    pub auth: Arc<dyn AuthProvider>,
    /// Read path for this route tree; see [`AppState::with_content`].
    pub content: Arc<dyn ContentSource>,
}

impl AppState {
    /// The same state with a different content source, for one route tree.
    pub fn with_content(&self, content: Arc<dyn ContentSource>) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }
}

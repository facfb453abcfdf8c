#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use hearts_api::auth::jwt::{generate_access_token, JwtConfig};
use hearts_api::auth::password::hash_password;
use hearts_api::auth::provider::{AuthProvider, LocalAuthProvider};
use hearts_api::auth::ROLE_ADMIN;
use hearts_api::config::{AdminConfig, ServerConfig, StorageConfig};
use hearts_api::content::SharedContent;
use hearts_api::provider::DataProvider;
use hearts_api::router::build_app_router;
use hearts_api::state::AppState;
use hearts_db::memory::{MemoryDocumentStore, MemoryObjectStore};
use hearts_db::{Catalog, CatalogConfig};

pub const TEST_ADMIN_EMAIL: &str = "artist@heartscreations.test";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and the test admin.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        catalog: CatalogConfig::default(),
        storage: StorageConfig::default(),
        admin: AdminConfig {
            email: TEST_ADMIN_EMAIL.to_string(),
            password_hash: hash_password(TEST_ADMIN_PASSWORD).expect("hashing should succeed"),
        },
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Full application wired to in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryDocumentStore>,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// A valid admin access token.
    pub fn admin_token(&self) -> String {
        generate_access_token(TEST_ADMIN_EMAIL, ROLE_ADMIN, &self.state.config.jwt)
            .expect("token generation should succeed")
    }

    pub fn provider(&self) -> &DataProvider {
        &self.state.provider
    }
}

/// Build the full application router over fresh in-memory stores.
///
/// The data provider is not mounted; tests load it explicitly with
/// `provider().fetch_all()` when they need the public tree populated.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryDocumentStore::new());
    let objects = Arc::new(MemoryObjectStore::new());
    let catalog = Catalog::new(store.clone(), objects.clone(), config.catalog);

    let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(config.admin.clone()));
    let provider = Arc::new(DataProvider::new(catalog.clone()));

    let state = AppState {
        config: Arc::new(config.clone()),
        catalog,
        content: Arc::new(SharedContent::new(Arc::clone(&provider))),
        provider,
        auth,
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        store,
        objects,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

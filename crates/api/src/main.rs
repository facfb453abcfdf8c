use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearts_api::auth::provider::{AuthProvider, LocalAuthProvider};
use hearts_api::config::{DocumentBackend, ObjectBackend, ServerConfig, StorageConfig};
use hearts_api::content::SharedContent;
use hearts_api::provider::DataProvider;
use hearts_api::router::build_app_router;
use hearts_api::state::AppState;
use hearts_db::memory::{MemoryDocumentStore, MemoryObjectStore};
use hearts_db::object_store::ObjectStore;
use hearts_db::postgres::PgDocumentStore;
use hearts_db::s3::{S3Config, S3ObjectStore};
use hearts_db::store::DocumentStore;
use hearts_db::Catalog;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearts_api=debug,hearts_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    let documents = connect_documents(&config.storage).await;
    let objects = connect_objects(&config.storage).await;
    let catalog = Catalog::new(documents, objects, config.catalog);

    // --- Data provider ---
    let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(config.admin.clone()));
    let provider = Arc::new(DataProvider::new(catalog.clone()));
    let provider_cancel = CancellationToken::new();
    let provider_handle = provider.mount(Arc::clone(&auth), provider_cancel.clone());

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog,
        content: Arc::new(SharedContent::new(Arc::clone(&provider))),
        provider,
        auth,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    provider_cancel.cancel();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, provider_handle).await.is_err() {
        tracing::warn!("Data provider did not stop within the drain timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

async fn connect_documents(storage: &StorageConfig) -> Arc<dyn DocumentStore> {
    match storage.document_store {
        DocumentBackend::Memory => {
            tracing::warn!("Using the in-memory document store; content is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
        DocumentBackend::Postgres => {
            let database_url = storage
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = hearts_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            hearts_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            hearts_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgDocumentStore::new(pool))
        }
    }
}

async fn connect_objects(storage: &StorageConfig) -> Arc<dyn ObjectStore> {
    match storage.object_store {
        ObjectBackend::Memory => Arc::new(MemoryObjectStore::with_public_base(
            &storage.s3_public_base_url,
        )),
        ObjectBackend::S3 => {
            let store = S3ObjectStore::new(S3Config {
                bucket: storage.s3_bucket.clone(),
                endpoint: storage.s3_endpoint.clone(),
                region: storage.s3_region.clone(),
                public_base_url: storage.s3_public_base_url.clone(),
                access_key_id: storage.s3_access_key_id.clone(),
                secret_access_key: storage.s3_secret_access_key.clone(),
            })
            .await;
            Arc::new(store)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

use std::time::Duration;

use hearts_db::memory::MEMORY_PUBLIC_BASE_URL;
use hearts_db::object_store::DEFAULT_BUCKET;
use hearts_db::timeout::Timeouts;
use hearts_db::CatalogConfig;

use crate::auth::jwt::JwtConfig;

/// Which [`hearts_db::store::DocumentStore`] backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentBackend {
    Memory,
    Postgres,
}

/// Which [`hearts_db::object_store::ObjectStore`] backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectBackend {
    Memory,
    S3,
}

/// Store backend selection and connection settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub document_store: DocumentBackend,
    /// Required when `document_store` is `Postgres`.
    pub database_url: Option<String>,
    pub object_store: ObjectBackend,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
    pub s3_public_base_url: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_store: DocumentBackend::Memory,
            database_url: None,
            object_store: ObjectBackend::Memory,
            s3_bucket: DEFAULT_BUCKET.to_string(),
            s3_endpoint: None,
            s3_region: None,
            s3_public_base_url: MEMORY_PUBLIC_BASE_URL.to_string(),
            s3_access_key_id: None,
            s3_secret_access_key: None,
        }
    }
}

/// The single admin account.
#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except the admin credentials and JWT secret has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown drain in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Cache window and remote call budgets.
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub jwt: JwtConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_secs(key: &str, default: u64) -> u64 {
    env_or(key, &default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid u64"))
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                          |
    /// |-------------------------|--------------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                        |
    /// | `PORT`                  | `3000`                                           |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                          |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                             |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                             |
    /// | `CACHE_TTL_SECS`        | `300`                                            |
    /// | `READ_TIMEOUT_SECS`     | `8`                                              |
    /// | `WRITE_TIMEOUT_SECS`    | `10`                                             |
    /// | `DOCUMENT_STORE`        | `memory` (`postgres` needs `DATABASE_URL`)       |
    /// | `OBJECT_STORE`          | `memory` (or `s3`)                               |
    /// | `S3_BUCKET`             | `images`                                         |
    /// | `S3_ENDPOINT`           | --                                               |
    /// | `S3_REGION`             | --                                               |
    /// | `S3_PUBLIC_BASE_URL`    | `http://localhost:3000/storage/v1/object/public` |
    /// | `S3_ACCESS_KEY_ID`      | --                                               |
    /// | `S3_SECRET_ACCESS_KEY`  | --                                               |
    /// | `ADMIN_EMAIL`           | **required**                                     |
    /// | `ADMIN_PASSWORD_HASH`   | **required**                                     |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or missing required variables; startup is
    /// expected to fail fast on misconfiguration.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let catalog = CatalogConfig {
            cache_ttl: Duration::from_secs(env_secs("CACHE_TTL_SECS", 300)),
            timeouts: Timeouts {
                read: Duration::from_secs(env_secs("READ_TIMEOUT_SECS", 8)),
                write: Duration::from_secs(env_secs("WRITE_TIMEOUT_SECS", 10)),
            },
        };

        let document_store = match env_or("DOCUMENT_STORE", "memory").as_str() {
            "memory" => DocumentBackend::Memory,
            "postgres" => DocumentBackend::Postgres,
            other => panic!("DOCUMENT_STORE must be 'memory' or 'postgres', got '{other}'"),
        };
        let database_url = env_opt("DATABASE_URL");
        if document_store == DocumentBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when DOCUMENT_STORE=postgres"
            );
        }

        let object_store = match env_or("OBJECT_STORE", "memory").as_str() {
            "memory" => ObjectBackend::Memory,
            "s3" => ObjectBackend::S3,
            other => panic!("OBJECT_STORE must be 'memory' or 's3', got '{other}'"),
        };

        let storage = StorageConfig {
            document_store,
            database_url,
            object_store,
            s3_bucket: env_or("S3_BUCKET", DEFAULT_BUCKET),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            s3_region: env_opt("S3_REGION"),
            s3_public_base_url: env_or("S3_PUBLIC_BASE_URL", MEMORY_PUBLIC_BASE_URL),
            s3_access_key_id: env_opt("S3_ACCESS_KEY_ID"),
            s3_secret_access_key: env_opt("S3_SECRET_ACCESS_KEY"),
        };

        let admin = AdminConfig {
            email: env_opt("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set in the environment"),
            password_hash: env_opt("ADMIN_PASSWORD_HASH")
                .expect("ADMIN_PASSWORD_HASH must be set in the environment"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_secs("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_secs("SHUTDOWN_TIMEOUT_SECS", 30),
            catalog,
            storage,
            admin,
            jwt: JwtConfig::from_env(),
        }
    }
}

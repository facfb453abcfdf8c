//! S3-compatible [`ObjectStore`] (AWS, MinIO, Supabase storage, ...).

use std::fmt;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::error::{StoreError, StoreResult};
use crate::object_store::{ObjectStore, PublicUrlScheme};

/// Region used when neither the config nor the environment sets one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Connection settings for [`S3ObjectStore`].
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Endpoint override for S3-compatible services; enables path-style addressing.
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// Prefix of public object URLs; objects are served at `{base}/{bucket}/{path}`.
    pub public_base_url: String,
    /// Static credentials. When unset the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("public_base_url", &self.public_base_url)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    urls: PublicUrlScheme,
}

impl S3ObjectStore {
    /// Build a client from the shared AWS config plus `config` overrides.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if sdk_config.region().is_none() || config.region.is_some() {
            let region = config.region.clone().unwrap_or_else(|| FALLBACK_REGION.to_string());
            builder = builder.region(Region::new(region));
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "static",
            ));
        }

        tracing::info!(bucket = %config.bucket, endpoint = ?config.endpoint, "S3 object store configured");
        Self::from_client(Client::from_conf(builder.build()), config.bucket, &config.public_base_url)
    }

    pub fn from_client(client: Client, bucket: String, public_base_url: &str) -> Self {
        let urls = PublicUrlScheme::new(public_base_url, &bucket);
        Self {
            client,
            bucket,
            urls,
        }
    }
}

fn backend_error<E>(action: &str, path: &str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Backend(format!("{action} {path}: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| backend_error("upload", path, e))?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.urls.url_for(path)
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        self.urls.path_for(url)
    }

    async fn remove(&self, paths: &[String]) -> StoreResult<()> {
        for path in paths {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(path)
                .send()
                .await
                .map_err(|e| backend_error("delete", path, e))?;
        }
        Ok(())
    }
}

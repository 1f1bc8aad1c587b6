//! S3-compatible blob store.
//!
//! The client is built from injected configuration (endpoint, region,
//! bucket, credentials) with path-style addressing, so any S3-compatible
//! object store works. The handle is explicitly owned by this struct,
//! never process-global.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use linkmarks_core::config::storage::S3StorageConfig;
use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::traits::BlobStore;

use crate::key_from_locator;

/// Blob store backed by an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3BlobStore {
    /// Build a client from configuration.
    pub fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() || config.bucket.is_empty() {
            return Err(AppError::configuration(
                "S3 storage requires endpoint and bucket",
            ));
        }

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "linkmarks-config",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let public_base = if config.public_base_url.is_empty() {
            format!(
                "{}/{}",
                config.endpoint.trim_end_matches('/'),
                config.bucket
            )
        } else {
            config.public_base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base,
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to upload blob '{key}'"),
                    e,
                )
            })?;

        debug!(key, bytes = size, "Uploaded blob");
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let key = key_from_locator(locator);

        // DeleteObject succeeds for missing keys, which gives the
        // idempotency the cascade-delete contract requires.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete blob '{key}'"),
                    e,
                )
            })?;

        debug!(key, "Deleted blob");
        Ok(())
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        let key = key_from_locator(locator);
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to stat blob '{key}'"),
                        service_err,
                    ))
                }
            }
        }
    }
}

//! Local filesystem blob store for development.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::traits::BlobStore;

use crate::key_from_locator;

/// Blob store rooted at a local directory. Locators are `/blobs/{key}`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<String> {
        let path = self.resolve(key);
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob '{key}'"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote blob");
        Ok(format!("/blobs/{key}"))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let key = key_from_locator(locator);
        match fs::remove_file(self.resolve(key)).await {
            Ok(()) => {
                debug!(key, "Deleted blob");
                Ok(())
            }
            // Idempotent: a missing blob is already deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob '{key}'"),
                e,
            )),
        }
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        Ok(self.resolve(key_from_locator(locator)).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_exists_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let locator = store
            .put("abc.jpg", Bytes::from("thumb"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(locator, "/blobs/abc.jpg");
        assert!(store.exists(&locator).await.unwrap());

        store.delete(&locator).await.unwrap();
        assert!(!store.exists(&locator).await.unwrap());
    }

    #[tokio::test]
    async fn delete_of_missing_locator_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.delete("/blobs/never-existed.jpg").await.unwrap();
    }
}

//! In-memory blob store used by tests and local development.
//!
//! Keeps an ordered event log of every put/delete so scenario tests can
//! assert call ordering (e.g., capture-before-commit).

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use linkmarks_core::result::AppResult;
use linkmarks_core::traits::BlobStore;

use crate::key_from_locator;

/// An observed blob store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobEvent {
    /// A `put` for the given key.
    Put(String),
    /// A `delete` for the given key.
    Delete(String),
}

/// Blob store held entirely in process memory. Locators are
/// `memory://{key}`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
    events: Mutex<Vec<BlobEvent>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Snapshot of the observed call log, in order.
    pub fn events(&self) -> Vec<BlobEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, event: BlobEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<String> {
        self.record(BlobEvent::Put(key.to_string()));
        self.blobs.insert(key.to_string(), data);
        Ok(format!("memory://{key}"))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let key = key_from_locator(locator);
        self.record(BlobEvent::Delete(key.to_string()));
        self.blobs.remove(key);
        Ok(())
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(key_from_locator(locator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_is_idempotent_and_logged() {
        let store = MemoryBlobStore::new();
        let locator = store
            .put("k.jpg", Bytes::from("x"), "image/jpeg")
            .await
            .unwrap();

        store.delete(&locator).await.unwrap();
        store.delete(&locator).await.unwrap();

        assert!(store.is_empty());
        assert_eq!(
            store.events(),
            vec![
                BlobEvent::Put("k.jpg".into()),
                BlobEvent::Delete("k.jpg".into()),
                BlobEvent::Delete("k.jpg".into()),
            ]
        );
    }
}

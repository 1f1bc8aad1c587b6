//! Blob store trait for pluggable object-storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for opaque binary object storage.
///
/// Implementations exist for S3-compatible object stores, the local
/// filesystem, and an in-memory store used by tests. The trait is defined
/// here in `linkmarks-core` and implemented in `linkmarks-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store an object under `key` and return its durable locator.
    ///
    /// Atomic from the caller's perspective: either a fully-written object
    /// is reachable at the returned locator, or an error is returned and
    /// nothing is reachable.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Delete the object a locator refers to.
    ///
    /// Idempotent: deleting a locator that does not exist is success.
    async fn delete(&self, locator: &str) -> AppResult<()>;

    /// Check whether an object exists at the given locator.
    async fn exists(&self, locator: &str) -> AppResult<bool>;
}

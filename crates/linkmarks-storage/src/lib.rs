//! # linkmarks-storage
//!
//! Blob storage backends implementing [`linkmarks_core::traits::BlobStore`]
//! (S3-compatible object stores, local filesystem, in-memory) and the
//! thumbnail encoder that turns raw captures into bounded-size images.

pub mod providers;
pub mod thumbnail;

pub use providers::local::LocalBlobStore;
pub use providers::memory::MemoryBlobStore;
pub use providers::s3::S3BlobStore;
pub use thumbnail::ThumbnailEncoder;

/// Recover the storage key from a blob locator.
///
/// Locators are `{base}/{key}` with flat keys, so the key is the final
/// path segment.
pub(crate) fn key_from_locator(locator: &str) -> &str {
    locator.rsplit('/').next().unwrap_or(locator)
}

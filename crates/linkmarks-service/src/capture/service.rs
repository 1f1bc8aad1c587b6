//! Composition of capturer, encoder, and blob store.

use std::sync::Arc;

use tracing::{debug, warn};

use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::traits::{BlobStore, PageCapturer};
use linkmarks_storage::ThumbnailEncoder;

use super::stage::CaptureStage;

/// Turns a URL into a durable thumbnail locator.
///
/// The pipeline is bytes-in-memory end to end; the only scoped resource
/// is the browser page, which the capturer releases on every exit path.
/// A failed step aborts the sequence with its own error kind: the blob
/// store is never called after a capture/encode failure, and no locator
/// escapes if the upload failed.
pub struct CaptureService {
    capturer: Arc<dyn PageCapturer>,
    blobs: Arc<dyn BlobStore>,
    encoder: ThumbnailEncoder,
}

impl CaptureService {
    /// Create a new capture service.
    pub fn new(
        capturer: Arc<dyn PageCapturer>,
        blobs: Arc<dyn BlobStore>,
        encoder: ThumbnailEncoder,
    ) -> Self {
        Self {
            capturer,
            blobs,
            encoder,
        }
    }

    /// Capture `url`, encode the thumbnail, and upload it under `key`.
    ///
    /// `key` must be fresh and unique per attempt (derived from a random
    /// identifier, not from the URL) so keys never collide and the URL
    /// never leaks into storage keys.
    pub async fn create_thumbnail(&self, url: &str, key: &str) -> AppResult<String> {
        debug!(url, key, stage = %CaptureStage::Capturing, "Capturing page");
        let raw = self
            .capturer
            .capture(url)
            .await
            .map_err(|e| abort(CaptureStage::Capturing, url, e))?;

        debug!(url, key, stage = %CaptureStage::Encoding, "Encoding thumbnail");
        let encoder = self.encoder.clone();
        let thumb = tokio::task::spawn_blocking(move || encoder.encode(&raw))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Thumbnail task panicked", e)
            })?
            .map_err(|e| abort(CaptureStage::Encoding, url, e))?;

        debug!(url, key, stage = %CaptureStage::Uploading, "Uploading thumbnail");
        let locator = self
            .blobs
            .put(key, thumb, "image/jpeg")
            .await
            .map_err(|e| abort(CaptureStage::Uploading, url, e))?;

        Ok(locator)
    }
}

/// Log an aborted attempt and pass the step's own error through.
fn abort(stage: CaptureStage, url: &str, err: AppError) -> AppError {
    warn!(url, stage = %stage, error = %err, "Capture pipeline aborted");
    err
}

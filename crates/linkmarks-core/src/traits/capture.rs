//! Page capturer trait for pluggable headless-rendering backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for rendering a URL into a raster image.
///
/// Implemented by `linkmarks-capture` on top of a headless Chromium;
/// tests substitute recording fakes. Each call renders in an isolated
/// page; implementations must bound their concurrency and release all
/// rendering resources on every exit path.
#[async_trait]
pub trait PageCapturer: Send + Sync + 'static {
    /// Render `url` and return the raw screenshot bytes (PNG).
    ///
    /// Errors are `CaptureUnreachable` when the target name cannot be
    /// resolved, `Capacity` when the concurrency pool and its queue are
    /// saturated, and `Capture` for any other navigation/render failure
    /// including the hard navigation timeout.
    async fn capture(&self, url: &str) -> AppResult<Bytes>;
}

//! The Chromium capture engine.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use linkmarks_core::config::capture::CaptureConfig;
use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::traits::PageCapturer;

use crate::guard::PageGuard;
use crate::limiter::CaptureLimiter;

/// Subresource types that add render time but not layout fidelity.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.otf",
];

/// Page capturer backed by one shared headless Chromium process.
///
/// Each capture opens a fresh page (isolated render state), navigates,
/// screenshots the viewport, and closes the page via [`PageGuard`] on
/// every exit path. Concurrency is bounded by a [`CaptureLimiter`].
pub struct ChromiumCapturer {
    browser: Browser,
    handler_task: JoinHandle<()>,
    limiter: CaptureLimiter,
    navigation_timeout: Duration,
    block_subresources: bool,
}

impl ChromiumCapturer {
    /// Launch the browser process and build the capturer.
    pub async fn launch(config: &CaptureConfig) -> AppResult<Self> {
        let pool_size = config.effective_pool_size();
        info!(
            pool_size,
            queue_depth = config.queue_depth,
            "Launching headless browser"
        );

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(config.viewport_width, config.viewport_height)
            .viewport(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                ..Default::default()
            });
        if !config.chrome_executable.is_empty() {
            builder = builder.chrome_executable(&config.chrome_executable);
        }
        let browser_config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            AppError::with_source(ErrorKind::Capture, "Failed to launch headless browser", e)
        })?;

        // The handler stream must be polled for the browser to make
        // progress; it ends when the browser process exits.
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser,
            handler_task,
            limiter: CaptureLimiter::new(pool_size, config.queue_depth),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_seconds),
            block_subresources: config.block_subresources,
        })
    }

    /// Close the browser process and stop the handler task.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Failed to wait for browser exit");
        }
        self.handler_task.abort();
        info!("Headless browser shut down");
    }

    async fn navigate_and_shoot(&self, page: &PageGuard, url: &str) -> AppResult<Bytes> {
        if self.block_subresources {
            page.execute(EnableParams::default())
                .await
                .map_err(|e| map_capture_error(e, url))?;
            let patterns = BLOCKED_URL_PATTERNS.iter().map(|p| p.to_string()).collect();
            page.execute(SetBlockedUrLsParams::new(patterns))
                .await
                .map_err(|e| map_capture_error(e, url))?;
        }

        page.goto(url).await.map_err(|e| map_capture_error(e, url))?;
        let response = page
            .wait_for_navigation_response()
            .await
            .map_err(|e| map_capture_error(e, url))?;

        // An error page renders fine, so navigation alone cannot tell a
        // live target from a 404; the main-frame status has to be checked.
        if let Some(request) = response {
            if let Some(inner) = &request.response {
                check_response_status(inner.status, url)?;
            }
        }

        let shot = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await
            .map_err(|e| map_capture_error(e, url))?;

        Ok(Bytes::from(shot))
    }
}

#[async_trait]
impl PageCapturer for ChromiumCapturer {
    async fn capture(&self, url: &str) -> AppResult<Bytes> {
        let _permit = self.limiter.acquire().await?;

        // Page creation counts against the timeout too, so a wedged
        // browser cannot pin a pool slot past the ceiling. A timeout
        // drops the guard mid-flight; its Drop closes the page in the
        // background.
        let result = tokio::time::timeout(self.navigation_timeout, async {
            let page = self
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| map_capture_error(e, url))?;
            let guard = PageGuard::new(page, url);
            let shot = self.navigate_and_shoot(&guard, url).await;
            guard.close().await;
            shot
        })
        .await;

        match result {
            Ok(Ok(bytes)) => {
                debug!(url, bytes = bytes.len(), "Captured page");
                Ok(bytes)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AppError::capture(format!(
                "navigation to '{url}' timed out after {}s",
                self.navigation_timeout.as_secs()
            ))),
        }
    }
}

/// Reject non-2xx main-frame responses.
///
/// Chromium navigates to 404/500 pages without an error, so the status
/// must be checked explicitly or the capture would thumbnail the error
/// page as if it were the target.
fn check_response_status(status: i64, url: &str) -> AppResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AppError::capture(format!(
            "'{url}' returned HTTP {status}"
        )))
    }
}

/// Map a browser-level error to the most specific capture kind.
///
/// Chromium reports DNS failures as `net::ERR_NAME_NOT_RESOLVED`; those
/// become `CaptureUnreachable` so callers can tell "target does not
/// exist" apart from a generic render failure.
fn map_capture_error(err: CdpError, url: &str) -> AppError {
    let text = err.to_string();
    if text.contains("ERR_NAME_NOT_RESOLVED") {
        AppError::with_source(
            ErrorKind::CaptureUnreachable,
            format!("'{url}' could not be resolved"),
            err,
        )
    } else {
        AppError::with_source(
            ErrorKind::Capture,
            format!("failed to capture '{url}': {text}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_resolution_failures_map_to_unreachable() {
        let err = CdpError::msg("net::ERR_NAME_NOT_RESOLVED at http://nope.invalid");
        assert_eq!(
            map_capture_error(err, "http://nope.invalid").kind,
            ErrorKind::CaptureUnreachable
        );
    }

    #[test]
    fn other_failures_map_to_generic_capture() {
        let err = CdpError::msg("net::ERR_CONNECTION_REFUSED");
        assert_eq!(
            map_capture_error(err, "http://localhost:1").kind,
            ErrorKind::Capture
        );
    }

    #[test]
    fn http_error_responses_fail_the_capture() {
        for status in [301, 404, 500, 503] {
            let err = check_response_status(status, "https://example.com").unwrap_err();
            assert_eq!(err.kind, ErrorKind::Capture);
        }
    }

    #[test]
    fn successful_responses_pass_the_status_check() {
        for status in [200, 204] {
            assert!(check_response_status(status, "https://example.com").is_ok());
        }
    }
}

//! RAII ownership of a browser page.
//!
//! chromiumoxide pages have no Drop implementation; they require an
//! explicit async `close()` to release their CDP target and renderer
//! state. `PageGuard` makes the close happen on every exit path: the
//! happy path closes explicitly, error paths fall back to a background
//! cleanup task spawned from Drop.

use std::ops::Deref;

use chromiumoxide::Page;
use tracing::{debug, warn};

/// Owns a page for the duration of one capture.
pub struct PageGuard {
    page: Option<Page>,
    url: String,
    runtime: tokio::runtime::Handle,
}

impl PageGuard {
    /// Wrap a freshly created page. Must be called on the runtime.
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            url: url.into(),
            runtime: tokio::runtime::Handle::current(),
        }
    }

    /// Close the page, consuming the guard. Preferred over the Drop
    /// fallback because close failures are observable here.
    pub async fn close(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!(url = %self.url, error = %e, "Failed to close capture page");
            }
        }
    }
}

impl Deref for PageGuard {
    type Target = Page;

    fn deref(&self) -> &Self::Target {
        self.page.as_ref().expect("page taken before drop")
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            let url = std::mem::take(&mut self.url);
            self.runtime.spawn(async move {
                match page.close().await {
                    Ok(()) => debug!(url = %url, "Closed capture page from drop"),
                    Err(e) => warn!(url = %url, error = %e, "Leaked capture page"),
                }
            });
        }
    }
}

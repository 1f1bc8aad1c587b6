//! Headless capture configuration.

use serde::{Deserialize, Serialize};

/// Headless browser capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Viewport width for page rendering.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    /// Viewport height for page rendering.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Hard ceiling on navigation + screenshot time, in seconds.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_seconds: u64,
    /// Number of captures allowed to run concurrently (0 = 2x CPU count).
    #[serde(default)]
    pub pool_size: usize,
    /// Number of requests allowed to wait for a pool slot before new
    /// requests fail fast with a capacity error.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Whether to block image/stylesheet/font subresources during capture.
    #[serde(default = "default_true")]
    pub block_subresources: bool,
    /// Path to the Chromium executable (empty = auto-detect).
    #[serde(default)]
    pub chrome_executable: String,
}

impl CaptureConfig {
    /// Effective pool size: the configured value, or 2x the CPU count.
    pub fn effective_pool_size(&self) -> usize {
        if self.pool_size > 0 {
            self.pool_size
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get() * 2)
                .unwrap_or(4)
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            navigation_timeout_seconds: default_navigation_timeout(),
            pool_size: 0,
            queue_depth: default_queue_depth(),
            block_subresources: true,
            chrome_executable: String::new(),
        }
    }
}

fn default_viewport_width() -> u32 {
    1024
}

fn default_viewport_height() -> u32 {
    768
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_queue_depth() -> usize {
    32
}

fn default_true() -> bool {
    true
}

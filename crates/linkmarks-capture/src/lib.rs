//! # linkmarks-capture
//!
//! Headless-browser page capture implementing
//! [`linkmarks_core::traits::PageCapturer`]. One shared Chromium process,
//! a fresh page per capture closed on every exit path, and a bounded
//! concurrency limiter so concurrent captures cannot exhaust the host.

pub mod engine;
pub mod guard;
pub mod limiter;

pub use engine::ChromiumCapturer;
pub use limiter::CaptureLimiter;

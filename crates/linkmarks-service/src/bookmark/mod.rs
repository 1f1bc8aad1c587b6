//! Bookmark tree orchestration.

pub mod service;

pub use service::{BookmarkService, CreatedLink, LinkDraft, RemovalOutcome};

//! # linkmarks-service
//!
//! Business logic layer for Linkmarks. [`CaptureService`] turns a URL
//! into a durable thumbnail locator; [`BookmarkService`] orchestrates it
//! with the tree store and the blob store so the no-orphan invariants
//! hold across every operation.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod bookmark;
pub mod capture;

pub use bookmark::{BookmarkService, CreatedLink, LinkDraft, RemovalOutcome};
pub use capture::{CaptureService, CaptureStage};

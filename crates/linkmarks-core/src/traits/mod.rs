//! Trait seams between the core pipelines and their external collaborators.

pub mod blob;
pub mod capture;

pub use blob::BlobStore;
pub use capture::PageCapturer;

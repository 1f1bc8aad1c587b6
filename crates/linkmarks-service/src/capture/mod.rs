//! URL-to-thumbnail pipeline.

pub mod service;
pub mod stage;

pub use service::CaptureService;
pub use stage::CaptureStage;

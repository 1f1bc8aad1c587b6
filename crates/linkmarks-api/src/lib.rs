//! # linkmarks-api
//!
//! Thin HTTP surface over [`linkmarks_service::BookmarkService`]. The
//! core stays transport-agnostic; status-code mapping and request DTOs
//! live only here.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

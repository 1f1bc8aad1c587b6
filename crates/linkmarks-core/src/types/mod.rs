//! Shared domain types.

pub mod id;

pub use id::{FolderId, SubfolderId, UserId};

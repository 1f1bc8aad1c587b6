//! # linkmarks-entity
//!
//! Domain entities for Linkmarks: the per-user bookmark tree document and
//! its structural mutation operations. The operations here are pure
//! functions over the in-memory document; every tree store implementation
//! delegates to them so Postgres and memory share one semantics.

pub mod tree;

pub use tree::model::{BookmarkTree, Folder, Link, Subfolder, DEFAULT_FOLDER_NAME};

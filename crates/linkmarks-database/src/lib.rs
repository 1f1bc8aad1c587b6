//! # linkmarks-database
//!
//! Persistence for bookmark tree documents: the [`TreeStore`] trait plus
//! a PostgreSQL implementation (one JSONB document per user) and an
//! in-memory implementation for tests and local development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use memory::MemoryTreeStore;
pub use postgres::PgTreeStore;
pub use store::TreeStore;

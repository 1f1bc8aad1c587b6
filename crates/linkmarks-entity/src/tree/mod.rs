//! The bookmark tree document.

pub mod model;
pub mod ops;

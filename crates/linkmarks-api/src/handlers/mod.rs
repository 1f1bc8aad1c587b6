pub mod health;
pub mod link;
pub mod tree;

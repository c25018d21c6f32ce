//! Storage layer for daybook
//!
//! Reads and writes record files under a vault root.

pub mod vault;

pub use vault::Vault;

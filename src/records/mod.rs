//! The four record kinds stored in a vault

pub mod entry;
pub mod media;
pub mod person;
pub mod place;

pub use entry::Entry;
pub use media::{Media, MediaType};
pub use person::{Person, Relationship};
pub use place::{Callout, Place};

//! daybook - journal records as markdown files with a frontmatter header
//!
//! Entries, people, places and media live as plain files that stay
//! readable and editable by hand. Reading a file and writing it back keeps
//! every header key the application does not know about, in place.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           daybook                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │   Records   │  │   Paths     │  │   Validation            │  │
//! │  │ Entry/Person│  │ (derived    │  │   (sanitized names)     │  │
//! │  │ Place/Media │  │  locations) │  │                         │  │
//! │  └──────┬──────┘  └──────┬──────┘  └───────────┬─────────────┘  │
//! │         │                │                     │                │
//! │         ▼                ▼                     ▼                │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │                 Schema (field tables)                       ││
//! │  │  known keys → typed slots, everything else → UnknownFields  ││
//! │  └──────────────────────────┬──────────────────────────────────┘│
//! │                             │                                   │
//! │                             ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │              daybook-frontmatter (codec)                    ││
//! │  │  Value inference, block parser, header writer               ││
//! │  └──────────────────────────┬──────────────────────────────────┘│
//! │                             │                                   │
//! │                             ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │              Vault (Markdown Files)                         ││
//! │  │  /Entries/{yyyy}/{MM-Month}/{dd}/*.md   /People/*.md  ...   ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod paths;
pub mod records;
pub mod schema;
pub mod storage;
pub mod transcript;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use paths::{derive_path, Layout, RecordPath};
pub use records::{Callout, Entry, Media, MediaType, Person, Place, Relationship};
pub use schema::{Record, RecordKind};
pub use storage::Vault;
pub use transcript::TimeRange;
pub use validation::sanitize_name;

/// Parse a record from file text. `None` when the text has no frontmatter
/// block or a required key is missing.
///
/// ```
/// use daybook::Person;
///
/// let text = "---\nrelationship: friend\n---\n\nMet at university.\n";
/// let person: Person = daybook::parse(text, "Sam.md").unwrap();
/// assert_eq!(person.name(), "Sam");
/// assert_eq!(person.body, "Met at university.");
/// ```
pub fn parse<R: Record>(text: &str, file_name: &str) -> Option<R> {
    schema::parse_record(text, file_name)
}

/// Render a record to file text
pub fn serialize<R: Record>(record: &R) -> String {
    schema::serialize_record(record)
}

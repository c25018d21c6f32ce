//! Storage locations derived from record content
//!
//! ```text
//! /Entries/2024/01-January/15/202401151030.md
//! /People/Jane Doe.md
//! /Places/Blue Bottle Coffee.md
//! /Media/The Hobbit.md
//! ```
//!
//! Entry locations are a function of the creation timestamp, so changing
//! it means the file has to move. Named records live under their
//! sanitized name, which is also their identity.

use chrono::{DateTime, Datelike, Local, Month};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schema::Record;

/// Filename stem format for entries (local time)
pub const ENTRY_STEM_FORMAT: &str = "%Y%m%d%H%M";

/// Top-level folder per record kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub entries: String,
    pub people: String,
    pub places: String,
    pub media: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            entries: "Entries".to_string(),
            people: "People".to_string(),
            places: "Places".to_string(),
            media: "Media".to_string(),
        }
    }
}

/// Where a record lives, relative to the vault root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordPath {
    pub directory: PathBuf,
    pub stem: String,
}

impl RecordPath {
    pub fn new(directory: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
        }
    }

    /// File name with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.stem, extension)
    }

    /// Path relative to the vault root
    pub fn relative(&self, extension: &str) -> PathBuf {
        self.directory.join(self.file_name(extension))
    }
}

/// `yyyyMMddHHmm` in local time
pub fn entry_stem(created: &DateTime<Local>) -> String {
    created.format(ENTRY_STEM_FORMAT).to_string()
}

/// `{entries}/{year}/{MM-MonthName}/{dd}`
pub fn entry_directory(layout: &Layout, created: &DateTime<Local>) -> PathBuf {
    let month = Month::try_from(created.month() as u8)
        .map(|m| m.name())
        .unwrap_or("Unknown");
    PathBuf::from(&layout.entries)
        .join(created.year().to_string())
        .join(format!("{:02}-{}", created.month(), month))
        .join(format!("{:02}", created.day()))
}

/// Canonical location of a record using the default layout
pub fn derive_path<R: Record>(record: &R) -> RecordPath {
    record.location(&Layout::default())
}

/// Default record file extension
pub const DEFAULT_EXTENSION: &str = "md";

/// Reduce a file name or path to its stem by dropping the directory and a
/// trailing `.{extension}`. Other dots are part of the name.
pub fn file_stem<'a>(file_name: &'a str, extension: &str) -> &'a str {
    let name = file_name.rsplit(&['/', '\\'][..]).next().unwrap_or(file_name);
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

//! Vault - a directory of record files
//!
//! Each record kind has a top-level folder (see [`Layout`]). Entries are
//! nested by date; named records sit directly in their folder.
//!
//! Directory structure:
//! ```text
//! /vault/
//!   .daybook/config.yaml
//!   /Entries/2024/01-January/15/
//!     202401151030.md
//!   /People/
//!     Jane Doe.md
//!   /Places/
//!     Blue Bottle Coffee.md
//!   /Media/
//!     The Hobbit.md
//! ```
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the destination, so a reader never sees a half-written
//! record. The vault holds no locks.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths::{file_stem, Layout, RecordPath};
use crate::schema::{parse_with_stem, serialize_record, Record};

/// A vault rooted at a directory
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    config: Config,
}

impl Vault {
    /// Open a vault, reading `.daybook/config.yaml` if present
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self { root, config })
    }

    /// A vault with an explicit configuration
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.config.layout
    }

    /// Absolute file path for a record location
    pub fn resolve(&self, location: &RecordPath) -> PathBuf {
        self.root.join(location.relative(&self.config.extension))
    }

    /// Where a record belongs in this vault
    pub fn location_of<R: Record>(&self, record: &R) -> RecordPath {
        record.location(&self.config.layout)
    }

    /// Read the record at a location. `Ok(None)` if there is no such file.
    pub async fn read<R: Record>(&self, location: &RecordPath) -> Result<Option<R>> {
        let path = self.resolve(location);
        if !exists(&path).await? {
            return Ok(None);
        }
        self.load(&path).await.map(Some)
    }

    /// Read a record from a file path. The file stem is the record's identity.
    pub async fn load<R: Record>(&self, path: &Path) -> Result<R> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| Error::FileReadError {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Unreadable {
                path: path.to_path_buf(),
            })?;
        let stem = file_stem(name, &self.config.extension);

        debug!(kind = R::KIND.as_str(), path = %path.display(), "reading record");
        parse_with_stem(&content, stem).ok_or_else(|| Error::Unreadable {
            path: path.to_path_buf(),
        })
    }

    /// Write a record to its canonical location, replacing any file there.
    ///
    /// If the record's identity no longer matches that location (an entry
    /// whose creation time changed), the file stored under the old identity
    /// is moved. When the old location cannot be told from the identity,
    /// nothing is written; use [`Vault::relocate`] with the known location.
    pub async fn save<R: Record>(&self, record: &R) -> Result<RecordPath> {
        let location = self.location_of(record);
        if record.id() == location.stem {
            return self.write(record, &location).await;
        }

        match R::stored_location(record.id(), &self.config.layout) {
            Some(previous) => self.relocate(record, &previous).await,
            None => Err(Error::LocationChanged {
                id: record.id().to_string(),
                path: self.resolve(&location),
            }),
        }
    }

    /// Write a new record. Fails if its location is already taken.
    pub async fn create<R: Record>(&self, record: &R) -> Result<RecordPath> {
        let location = self.location_of(record);
        let path = self.resolve(&location);
        if exists(&path).await? {
            return Err(Error::RecordAlreadyExists {
                id: record.id().to_string(),
                path,
            });
        }
        self.save(record).await
    }

    /// Save a record whose location may have changed since it was read from
    /// `previous`. The new file is written before the old one is removed, so
    /// the record is never missing from disk and never left in two places.
    pub async fn relocate<R: Record>(&self, record: &R, previous: &RecordPath) -> Result<RecordPath> {
        let location = self.location_of(record);
        self.write(record, &location).await?;
        if &location != previous {
            let old = self.resolve(previous);
            if exists(&old).await? {
                fs::remove_file(&old).await.map_err(|source| Error::FileWriteError {
                    path: old.clone(),
                    source,
                })?;
            }
            debug!(
                kind = R::KIND.as_str(),
                from = %previous.relative(&self.config.extension).display(),
                to = %location.relative(&self.config.extension).display(),
                "moved record"
            );
        }
        Ok(location)
    }

    /// Rewrite a record into an explicit file, in place, without moving it
    pub async fn write_to<R: Record>(&self, record: &R, path: &Path) -> Result<()> {
        write_atomic(path, &serialize_record(record)).await?;
        debug!(kind = R::KIND.as_str(), path = %path.display(), "rewrote record");
        Ok(())
    }

    async fn write<R: Record>(&self, record: &R, location: &RecordPath) -> Result<RecordPath> {
        let path = self.resolve(location);
        write_atomic(&path, &serialize_record(record)).await?;
        debug!(kind = R::KIND.as_str(), path = %path.display(), "saved record");
        Ok(location.clone())
    }

    /// Delete the file at a location. Returns whether anything was removed.
    pub async fn delete(&self, location: &RecordPath) -> Result<bool> {
        let path = self.resolve(location);
        if !exists(&path).await? {
            return Ok(false);
        }
        fs::remove_file(&path)
            .await
            .map_err(|source| Error::FileWriteError {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "deleted record");
        Ok(true)
    }

    /// Every readable record of one kind. Files without a readable header
    /// are skipped.
    pub async fn list<R: Record>(&self) -> Result<Vec<R>> {
        let mut records = Vec::new();
        for path in self.files_of(R::KIND.directory(&self.config.layout)) {
            match self.load::<R>(&path).await {
                Ok(record) => records.push(record),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping file"),
            }
        }
        Ok(records)
    }

    /// Record files under a top-level folder, sorted by path
    fn files_of(&self, directory: &str) -> Vec<PathBuf> {
        let base = self.root.join(directory);
        if !base.is_dir() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&base)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| self.is_record_file(path))
            .collect();
        files.sort();
        files
    }

    fn is_record_file(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(true);
        !hidden
            && path
                .extension()
                .map(|e| e == self.config.extension.as_str())
                .unwrap_or(false)
    }
}

/// Whether `path` exists. Errors other than "not found" are reported, not
/// read as absence.
async fn exists(path: &Path) -> Result<bool> {
    fs::try_exists(path)
        .await
        .map_err(|source| Error::FileReadError {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `content` to a sibling temp file, then rename it over `path`
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| Error::Other(format!(
        "'{}' has no parent directory",
        path.display()
    )))?;
    fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::FileWriteError {
            path: parent.to_path_buf(),
            source,
        })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record");
    let tmp = parent.join(format!(".{}.tmp", name));

    fs::write(&tmp, content)
        .await
        .map_err(|source| Error::FileWriteError {
            path: tmp.clone(),
            source,
        })?;
    if let Err(source) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::FileWriteError {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Person;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_vault_crud() {
        let tmp = TempDir::new().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();

        // Create
        let mut person = Person::new("Jane Doe").unwrap();
        person.email = Some("jane@example.com".into());
        person.body = "Met at the conference.".into();
        let location = vault.create(&person).await.unwrap();
        assert_eq!(location, RecordPath::new("People", "Jane Doe"));
        assert!(tmp.path().join("People/Jane Doe.md").exists());

        // Duplicate
        let err = vault.create(&person).await.unwrap_err();
        assert!(matches!(err, Error::RecordAlreadyExists { .. }));

        // Read
        let fetched: Person = vault.read(&location).await.unwrap().unwrap();
        assert_eq!(fetched.id, "Jane Doe");
        assert_eq!(fetched.email, person.email);
        assert_eq!(fetched.body, person.body);

        // List
        let people: Vec<Person> = vault.list().await.unwrap();
        assert_eq!(people.len(), 1);

        // Delete
        assert!(vault.delete(&location).await.unwrap());
        assert!(!vault.delete(&location).await.unwrap());
        assert!(vault.read::<Person>(&location).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let tmp = TempDir::new().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        std::fs::create_dir_all(tmp.path().join("People")).unwrap();
        std::fs::write(tmp.path().join("People/Plain.md"), "no header here").unwrap();

        let location = RecordPath::new("People", "Plain");
        let err = vault.read::<Person>(&location).await.unwrap_err();
        assert!(matches!(err, Error::Unreadable { .. }));

        let people: Vec<Person> = vault.list().await.unwrap();
        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_no_temp_files_left() {
        let tmp = TempDir::new().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        vault.save(&Person::new("Sam").unwrap()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.path().join("People"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Sam.md"]);
    }

    #[tokio::test]
    async fn test_io_error_is_not_absence() {
        let tmp = TempDir::new().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        // A file where the People folder should be
        std::fs::write(tmp.path().join("People"), "not a folder").unwrap();

        let location = RecordPath::new("People", "Sam");
        let err = vault.read::<Person>(&location).await.unwrap_err();
        assert!(matches!(err, Error::FileReadError { .. }));
        assert!(vault.create(&Person::new("Sam").unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_save_refuses_unknown_previous_location() {
        use crate::records::Entry;
        use chrono::{Local, TimeZone};

        let tmp = TempDir::new().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        let created = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let text = format!(
            "---\ndate_created: {}\n---\n",
            daybook_frontmatter::format_moment(&created)
        );
        std::fs::create_dir_all(tmp.path().join("Inbox")).unwrap();
        std::fs::write(tmp.path().join("Inbox/notes.md"), text).unwrap();

        let entry: Entry = vault.load(&tmp.path().join("Inbox/notes.md")).await.unwrap();
        let err = vault.save(&entry).await.unwrap_err();
        assert!(matches!(err, Error::LocationChanged { .. }));
        assert!(!tmp
            .path()
            .join("Entries/2024/01-January/15/202401151030.md")
            .exists());

        let previous = RecordPath::new("Inbox", "notes");
        vault.relocate(&entry, &previous).await.unwrap();
        assert!(!tmp.path().join("Inbox/notes.md").exists());
        assert!(tmp
            .path()
            .join("Entries/2024/01-January/15/202401151030.md")
            .exists());
    }
}

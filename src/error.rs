//! Error types for daybook
//!
//! The codec itself never fails (parsing yields `Option`, rendering always
//! yields text). These errors cover the surfaces around it: the file store,
//! configuration, and validation of names for new records.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for daybook operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Record Errors
    // ==========================================================================
    #[error("Record '{id}' already exists at '{path}'")]
    RecordAlreadyExists { id: String, path: PathBuf },

    #[error("File '{path}' has no readable frontmatter")]
    Unreadable { path: PathBuf },

    #[error("Record '{id}' now belongs at '{path}' but its previous file is unknown")]
    LocationChanged { id: String, path: PathBuf },

    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Reserved name '{name}' cannot be used")]
    ReservedName { name: String },

    // ==========================================================================
    // IO Errors
    // ==========================================================================
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==========================================================================
    // Serialization Errors
    // ==========================================================================
    #[error("Failed to parse config: {message}")]
    ConfigParseError { message: String },

    // ==========================================================================
    // Catch-all
    // ==========================================================================
    #[error("{0}")]
    Other(String),
}

/// Result type alias for daybook operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParseError {
            message: err.to_string(),
        }
    }
}

impl From<crate::validation::ValidationError> for Error {
    fn from(err: crate::validation::ValidationError) -> Self {
        match err {
            crate::validation::ValidationError::InvalidIdentifier(value, reason) => {
                Error::InvalidName {
                    kind: "name",
                    value,
                    reason,
                }
            }
            crate::validation::ValidationError::TooLong(value, _max) => Error::InvalidName {
                kind: "name",
                value,
                reason: "exceeds maximum length",
            },
            crate::validation::ValidationError::Empty => Error::InvalidName {
                kind: "name",
                value: String::new(),
                reason: "is empty once reserved characters are removed",
            },
            crate::validation::ValidationError::Reserved(name) => Error::ReservedName { name },
        }
    }
}

// =============================================================================
// Error Display Helpers
// =============================================================================

impl Error {
    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::RecordAlreadyExists { .. } => {
                Some("Pick a different name or edit the existing file")
            }
            Error::LocationChanged { .. } => {
                Some("Move it with relocate, passing the location it was read from")
            }
            Error::Unreadable { .. } => {
                Some("The file must start with a '---' line and close the header with another")
            }
            Error::InvalidName { .. } => {
                Some("Use a name with at least one character outside <>:\"/\\|?*")
            }
            Error::ConfigParseError { .. } => Some("Check .daybook/config.yaml for YAML syntax errors"),
            _ => None,
        }
    }

    /// Returns true if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RecordAlreadyExists { .. }
                | Error::Unreadable { .. }
                | Error::LocationChanged { .. }
                | Error::InvalidName { .. }
                | Error::ReservedName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RecordAlreadyExists {
            id: "Sam".to_string(),
            path: PathBuf::from("People/Sam.md"),
        };
        assert_eq!(err.to_string(), "Record 'Sam' already exists at 'People/Sam.md'");
    }

    #[test]
    fn test_error_suggestion() {
        let err = Error::Unreadable {
            path: PathBuf::from("Entries/x.md"),
        };
        assert!(err.suggestion().is_some());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_validation_conversion() {
        let err: Error = crate::validation::ValidationError::Reserved("con".into()).into();
        assert!(matches!(err, Error::ReservedName { name } if name == "con"));
    }
}

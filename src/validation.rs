//! Name sanitization and validation
//!
//! People, places and media are stored under a file named after them, so
//! the human-entered name is cleaned of filesystem-reserved characters
//! before it becomes the record's identity.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid name '{0}': {1}")]
    InvalidIdentifier(String, &'static str),

    #[error("Name '{0}' is too long (max {1} bytes)")]
    TooLong(String, usize),

    #[error("Name cannot be empty")]
    Empty,

    #[error("Reserved name: '{0}'")]
    Reserved(String),
}

/// Maximum length for a file stem
pub const MAX_NAME_LENGTH: usize = 255;

/// Characters that cannot appear in a file name on the target platforms
pub const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Reserved names that cannot be used
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul",
    "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8", "com9",
    "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Clean a human-entered name into a file stem.
///
/// Removes `<>:"/\|?*`, collapses whitespace runs to one space, and trims.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_name(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Check that an already-sanitized stem can be used as a file name
///
/// Rules:
/// - Must be 1-255 bytes
/// - Cannot start with a dot (hidden files)
/// - Cannot be a reserved device name (case-insensitive)
pub fn validate_stem(stem: &str) -> Result<(), ValidationError> {
    if stem.is_empty() {
        return Err(ValidationError::Empty);
    }

    if stem.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(stem.to_string(), MAX_NAME_LENGTH));
    }

    if RESERVED_NAMES.contains(&stem.to_lowercase().as_str()) {
        return Err(ValidationError::Reserved(stem.to_string()));
    }

    if stem.starts_with('.') {
        return Err(ValidationError::InvalidIdentifier(
            stem.to_string(),
            "cannot start with a dot",
        ));
    }

    if stem.contains(RESERVED_CHARS) {
        return Err(ValidationError::InvalidIdentifier(
            stem.to_string(),
            "contains reserved characters",
        ));
    }

    Ok(())
}

/// Sanitize a name and validate the result
pub fn identity_for(name: &str) -> Result<String, ValidationError> {
    let stem = sanitize_name(name);
    validate_stem(&stem)?;
    Ok(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_reserved() {
        assert_eq!(sanitize_name("AC/DC"), "ACDC");
        assert_eq!(sanitize_name("What? <Live>"), "What Live");
        assert_eq!(sanitize_name("a:b\"c|d*e\\f"), "abcdef");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_name("  Jane \t  Doe \n"), "Jane Doe");
        assert_eq!(sanitize_name("Café : Central"), "Café Central");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for raw in [
            "Jane Doe",
            " a / b ",
            "???",
            "tab\tand\nnewline",
            "<>:\"/\\|?*",
            "  ::  x  ::  ",
            "",
        ] {
            let once = sanitize_name(raw);
            assert_eq!(sanitize_name(&once), once);
            assert!(!once.contains(RESERVED_CHARS));
        }
    }

    #[test]
    fn test_validate_stem() {
        assert!(validate_stem("Jane Doe").is_ok());
        assert!(validate_stem("Café Central").is_ok());
        assert!(matches!(validate_stem(""), Err(ValidationError::Empty)));
        assert!(matches!(validate_stem("CON"), Err(ValidationError::Reserved(_))));
        assert!(validate_stem(".hidden").is_err());
        assert!(validate_stem("a/b").is_err());
        assert!(validate_stem(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_identity_for() {
        assert_eq!(identity_for(" The  Hobbit ").unwrap(), "The Hobbit");
        assert!(identity_for("???").is_err());
        assert!(identity_for("..").is_err());
    }
}

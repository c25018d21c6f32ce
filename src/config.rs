//! Vault configuration
//!
//! Read from `.daybook/config.yaml` under the vault root. Every key is
//! optional:
//!
//! ```yaml
//! layout:
//!   entries: Journal
//!   people: People
//! extension: md
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::{Layout, DEFAULT_EXTENSION};

/// Settings for one vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Top-level folder per record kind
    pub layout: Layout,
    /// File extension for record files, without the dot
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Location of the config file for a vault root
    pub fn path(root: &Path) -> PathBuf {
        root.join(".daybook").join("config.yaml")
    }

    /// Load the config for a vault, falling back to defaults if absent
    pub fn load(root: &Path) -> crate::Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| {
            crate::Error::FileReadError {
                path: path.clone(),
                source,
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config text; an empty document means defaults
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save the config under a vault root
    pub fn save(&self, root: &Path) -> crate::Result<()> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self).map_err(|e| crate::Error::Other(e.to_string()))?;
        std::fs::write(&path, content).map_err(|source| crate::Error::FileWriteError {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }
}

//! User settings read from `settings.toml`.
//!
//! ```toml
//! [storage]
//! data_dir = "/home/me/books"
//!
//! [confirm]
//! assume_yes = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "Pagemark";
const APPLICATION: &str = "pagemark";

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where reading data lives.
    pub storage: StorageSettings,

    /// Confirmation behavior for destructive commands.
    pub confirm: ConfirmSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `books.json` and `book-progresses.json`.
    /// Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmSettings {
    /// Answer "yes" to every confirmation prompt.
    pub assume_yes: bool,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    ///
    /// A missing file yields defaults. An unreadable or malformed file also
    /// yields defaults, with a warning.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "could not read settings");
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Data directory to use: `overridden` if given, then the configured
    /// directory, then the platform data directory.
    pub fn data_dir(&self, overridden: Option<&Path>) -> PathBuf {
        overridden
            .map(Path::to_path_buf)
            .or_else(|| self.storage.data_dir.clone())
            .unwrap_or_else(default_data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("pagemark-data"))
}

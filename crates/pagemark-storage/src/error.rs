//! Storage error types.
//!
//! All storage operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be used by the storage backends.
    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Value could not be encoded as JSON.
    #[error("Failed to serialize value for key {key}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored JSON could not be decoded.
    #[error("Failed to deserialize value for key {key}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend refused the operation (lock poisoned, closed, quota).
    #[error("Storage backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidKey { key } => {
                format!("'{key}' cannot be used as a storage key.")
            }
            Self::Serialization { key, .. } => {
                format!("An error occurred while saving the '{key}' data.")
            }
            Self::Deserialization { key, .. } => {
                format!("The saved '{key}' data could not be read. It may be corrupted.")
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Unavailable { reason } => {
                format!("Your reading data could not be accessed: {reason}")
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to the data directory.".into())
                }
            }
            Self::InvalidKey { .. } => {
                Some("Use only letters, digits, '-', '_' and '.' in storage keys.".into())
            }
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => {
                Some("Restore the file from a backup or remove it to start over.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different data directory.".into())
            }
            Self::Unavailable { .. } => Some("Close other Pagemark windows and retry.".into()),
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

//! JSON file reads.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::io::hash::content_hash;

/// Read and decode the JSON file at `path`.
///
/// Returns the value together with its content hash, or `None` when the file
/// does not exist.
pub fn read_json_file(path: &Path, key: &str) -> Result<Option<(Value, String)>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let value = serde_json::from_slice(&bytes).map_err(|source| StorageError::Deserialization {
        key: key.to_string(),
        source,
    })?;

    tracing::debug!(key, path = %path.display(), "read storage file");
    Ok(Some((value, content_hash(&bytes))))
}

//! Atomic JSON writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::io::hash::content_hash;

/// Write `value` as pretty JSON to `path` and return the content hash.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written file behind.
pub fn write_json_atomic(path: &Path, key: &str, value: &Value) -> Result<String> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StorageError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| StorageError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StorageError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(key, path = %path.display(), bytes = bytes.len(), "wrote storage file");
    Ok(content_hash(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn creates_parent_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("books.json");

        let hash = write_json_atomic(&path, "books", &json!([{"title": "Foo"}])).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(hash, content_hash(&fs::read(&path).unwrap()));
    }
}

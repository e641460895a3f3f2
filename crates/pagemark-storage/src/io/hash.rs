//! Content hashing for foreign-write detection.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, StorageError};

/// SHA-256 of `bytes`, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hash of the file at `path`, or `None` when it does not exist.
pub(crate) fn file_hash(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(content_hash(&bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_content_hash() {
        // Known SHA-256 hash for "Hello, World!"
        assert_eq!(
            content_hash(b"Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_file_hash_matches_content_hash() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"Test content").unwrap();
        temp_file.flush().unwrap();

        let hash = file_hash(temp_file.path()).unwrap();
        assert_eq!(hash, Some(content_hash(b"Test content")));
    }

    #[test]
    fn test_missing_file_has_no_hash() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(file_hash(&dir.path().join("absent.json")).unwrap(), None);
    }
}

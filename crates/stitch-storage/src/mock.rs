//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error context.
const BACKEND: &str = "Mock";

/// Check whether `key` lives in `dir`, directly or (when `recursive`) at any
/// depth below it.
fn in_dir(key: &str, dir: &str, recursive: bool) -> bool {
    let rest = if dir.is_empty() {
        key
    } else {
        match key.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
            Some(rest) => rest,
            None => return false,
        }
    };
    recursive || !rest.contains('/')
}

/// Mock storage for testing.
///
/// Seeded files are served by the read methods; everything written through
/// [`Storage::write`] is captured separately and can be inspected with
/// [`written_text`](Self::written_text) and
/// [`written_paths`](Self::written_paths).
///
/// Listing a directory that holds no seeded files returns an empty list;
/// the mock has no notion of directories existing on their own.
///
/// # Example
///
/// ```
/// use stitch_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new().with_file("guides/setup.md", "# Setup");
/// let content = storage.read("guides/setup.md").unwrap();
/// assert_eq!(content, "# Setup");
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    written: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a text file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into().into_bytes());
        self
    }

    /// Seed a binary file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_bytes(self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), contents.into());
        self
    }

    /// Paths written through [`Storage::write`], sorted.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn written_paths(&self) -> Vec<String> {
        self.written.read().unwrap().keys().cloned().collect()
    }

    /// Written contents for a path, decoded as UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn written_text(&self, path: &str) -> Option<String> {
        self.written
            .read()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Written contents for a path as raw bytes.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn written_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.written.read().unwrap().get(path).cloned()
    }

    fn list_matching(&self, dir: &str, recursive: bool) -> Vec<String> {
        let mut paths: Vec<String> = self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|key| in_dir(key, dir, recursive))
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.list_matching(dir, false))
    }

    fn list_recursive(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.list_matching(dir, true))
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.read_bytes(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files.read().unwrap().get(path).cloned().ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound)
                .with_path(path)
                .with_backend(BACKEND)
        })
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        self.written
            .write()
            .unwrap()
            .insert(path.to_owned(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_new_empty() {
        let storage = MockStorage::new();

        assert!(storage.list("").unwrap().is_empty());
        assert!(storage.written_paths().is_empty());
    }

    #[test]
    fn test_with_file_and_read() {
        let storage = MockStorage::new().with_file("guide.md", "# Guide\n\nContent.");

        let content = storage.read("guide.md").unwrap();

        assert_eq!(content, "# Guide\n\nContent.");
    }

    #[test]
    fn test_with_bytes_and_read_bytes() {
        let storage = MockStorage::new().with_bytes("logo.png", vec![0x89, 0x50]);

        let bytes = storage.read_bytes("logo.png").unwrap();

        assert_eq!(bytes, vec![0x89, 0x50]);
    }

    #[test]
    fn test_read_missing() {
        let storage = MockStorage::new();

        let err = storage.read("missing.md").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Mock"));
        assert_eq!(err.path(), Some(Path::new("missing.md")));
    }

    #[test]
    fn test_list_root_non_recursive() {
        let storage = MockStorage::new()
            .with_file("zeta.md", "z")
            .with_file("alpha.md", "a")
            .with_file("guides/inner.md", "i");

        let files = storage.list("").unwrap();

        assert_eq!(files, vec!["alpha.md".to_owned(), "zeta.md".to_owned()]);
    }

    #[test]
    fn test_list_subdirectory() {
        let storage = MockStorage::new()
            .with_file("guides/beta.md", "b")
            .with_file("guides/alpha.md", "a")
            .with_file("guidesx/other.md", "o");

        let files = storage.list("guides").unwrap();

        assert_eq!(
            files,
            vec!["guides/alpha.md".to_owned(), "guides/beta.md".to_owned()]
        );
    }

    #[test]
    fn test_list_empty_dir_returns_empty() {
        let storage = MockStorage::new().with_file("readme.md", "r");

        assert!(storage.list("guides").unwrap().is_empty());
    }

    #[test]
    fn test_list_recursive() {
        let storage = MockStorage::new()
            .with_file("assets/logo.svg", "s")
            .with_file("assets/css/style.css", "c");

        let files = storage.list_recursive("assets").unwrap();

        assert_eq!(
            files,
            vec![
                "assets/css/style.css".to_owned(),
                "assets/logo.svg".to_owned()
            ]
        );
    }

    #[test]
    fn test_exists() {
        let storage = MockStorage::new().with_file("guide.md", "content");

        assert!(storage.exists("guide.md"));
        assert!(!storage.exists("missing.md"));
    }

    #[test]
    fn test_write_is_captured() {
        let storage = MockStorage::new();

        storage.write("site/index.html", b"<html></html>").unwrap();
        storage.write("site/assets/style.css", b"body {}").unwrap();

        assert_eq!(
            storage.written_paths(),
            vec!["site/assets/style.css".to_owned(), "site/index.html".to_owned()]
        );
        assert_eq!(
            storage.written_text("site/index.html"),
            Some("<html></html>".to_owned())
        );
        assert_eq!(
            storage.written_bytes("site/assets/style.css"),
            Some(b"body {}".to_vec())
        );
    }

    #[test]
    fn test_write_does_not_affect_reads() {
        let storage = MockStorage::new();

        storage.write("generated.html", b"x").unwrap();

        assert!(!storage.exists("generated.html"));
        assert!(storage.read("generated.html").is_err());
    }
}

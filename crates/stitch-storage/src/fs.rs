//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error context.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a directory.
///
/// All paths are resolved against the root. Paths that are absolute or that
/// contain `..` components are rejected so a build cannot escape its root.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a storage rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against the root, rejecting escapes.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(rel))
    }
}

/// Join a directory prefix and a file name into a root-relative path.
fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Read one directory level, appending files to `files` and subdirectories
/// to `dirs` (when given).
fn read_dir_level(
    full: &Path,
    rel_dir: &str,
    files: &mut Vec<String>,
    mut dirs: Option<&mut Vec<String>>,
) -> Result<(), StorageError> {
    let entries = fs::read_dir(full)
        .map_err(|e| StorageError::io(e, Some(full.to_path_buf())).with_backend(BACKEND))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| StorageError::io(e, Some(full.to_path_buf())).with_backend(BACKEND))?;
        let file_type = entry
            .file_type()
            .map_err(|e| StorageError::io(e, Some(entry.path())).with_backend(BACKEND))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_file() {
            files.push(join_rel(rel_dir, &name));
        } else if file_type.is_dir() {
            if let Some(dirs) = dirs.as_deref_mut() {
                dirs.push(join_rel(rel_dir, &name));
            }
        }
    }

    Ok(())
}

impl Storage for FsStorage {
    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let full = self.resolve(dir)?;
        let mut files = Vec::new();
        read_dir_level(&full, dir, &mut files, None)?;
        files.sort();
        Ok(files)
    }

    fn list_recursive(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_owned()];
        while let Some(current) = pending.pop() {
            let full = self.resolve(&current)?;
            read_dir_level(&full, &current, &mut files, Some(&mut pending))?;
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|e| StorageError::io(e, Some(full)).with_backend(BACKEND))
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        fs::read(&full).map_err(|e| StorageError::io(e, Some(full)).with_backend(BACKEND))
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(e, Some(parent.to_path_buf())).with_backend(BACKEND))?;
        }
        fs::write(&full, contents).map_err(|e| StorageError::io(e, Some(full)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|full| full.is_file())
    }
}

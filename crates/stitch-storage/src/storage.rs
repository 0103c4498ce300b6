//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for abstracting file access during a
//! site build, along with [`StorageError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! All path parameters are forward-slash paths relative to the storage root:
//! - `""` - the root itself
//! - `"readme.md"` - file at the root
//! - `"guides/setup.md"` - nested file
//!
//! Backends map these to their internal representation. Listings are sorted
//! lexicographically so build output does not depend on directory iteration
//! order.

use std::path::{Path, PathBuf};

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path context, if attached.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if attached.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for reading build inputs and writing build outputs.
///
/// A storage instance is rooted at a directory; all paths are relative to
/// that root. The builder uses one instance rooted at the project directory
/// for inputs and one rooted at the output directory for generated files.
pub trait Storage: Send + Sync {
    /// List files directly inside a directory, sorted by path.
    ///
    /// Subdirectories are not descended into. Paths are relative to the
    /// storage root and include the directory prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory cannot be read.
    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError>;

    /// List files under a directory recursively, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a directory cannot be read.
    fn list_recursive(&self, dir: &str) -> Result<Vec<String>, StorageError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file does not exist or cannot be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Read a file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file does not exist or cannot be read.
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    fn write(&self, path: &str, contents: &[u8]) -> Result<(), StorageError>;

    /// Check if a file exists at the given path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;
}

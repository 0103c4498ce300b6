//! Storage abstraction for the Stitch site generator.
//!
//! This crate provides a [`Storage`] trait for abstracting file access during
//! a site build. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between page assembly logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with listing, read, write, and existence methods
//! - [`FsStorage`] implementation rooted at a directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! Builds use two instances: one rooted at the project directory for inputs
//! and one rooted at the output directory for generated files.
//!
//! # Example
//!
//! ```no_run
//! use stitch_storage::{FsStorage, Storage};
//!
//! # fn main() -> Result<(), stitch_storage::StorageError> {
//! let storage = FsStorage::new("docs");
//! for path in storage.list("guides")? {
//!     let content = storage.read(&path)?;
//!     println!("{path}: {} bytes", content.len());
//! }
//! # Ok(())
//! # }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};

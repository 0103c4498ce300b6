//! Page rendering and site assembly for Stitch.
//!
//! This crate turns digested metadata and markdown sources into a static
//! documentation site:
//!
//! - [`ClassPage`] and [`FilePage`]: pure transforms from one entity to an
//!   HTML content fragment.
//! - [`NavigationBuilder`]: titled navigation fragments and their configured
//!   composition.
//! - [`SiteBuilder`]: the orchestrator running the seed, navigate, render,
//!   and finalize phases of one batch build.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use stitch_config::Config;
//! use stitch_site::SiteBuilder;
//! use stitch_storage::FsStorage;
//!
//! let config = Config::load(None, None)?;
//! let source = Arc::new(FsStorage::new(config.project_root.clone()));
//! let dest = Arc::new(FsStorage::new(config.output_resolved.dir.clone()));
//!
//! let summary = SiteBuilder::new(config, source, dest).build()?;
//! assert!(summary.pages > 0);
//! # Ok(())
//! # }
//! ```

mod builder;
mod class_page;
mod file_page;
mod nav;
mod templates;

pub use builder::{BuildError, BuildSummary, SiteBuilder};
pub use class_page::ClassPage;
pub use file_page::FilePage;
pub use nav::{NavEntry, Navigation, NavigationBuilder};

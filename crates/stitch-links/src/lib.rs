//! Symbol cross-reference resolution for stitch.
//!
//! This crate provides the two leaf components of the rendering pipeline:
//!
//! - [`LinkRegistry`]: the per-run symbol → URL table, seeded from digested
//!   metadata and extended with manually registered external mappings.
//! - [`expand`]: the reference expander that substitutes `[[Name]]` markers
//!   in prose and signature text with hyperlinks.
//!
//! A registry is an explicitly constructed instance handed to whoever needs
//! it; several independent registries can coexist in one process.

mod expand;
mod registry;

pub use expand::expand;
pub use registry::{LinkRegistry, OnConflict, Resolution};

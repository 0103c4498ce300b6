//! Free-text page rendering for guides and loose markdown documents.

use stitch_render::{MarkdownRenderer, RenderResult};
use stitch_storage::{Storage, StorageError};

/// Renders guide and root-level markdown documents.
///
/// File pages are free text, not structured API documentation: the markdown
/// is rendered as-is and reference markers are not expanded, so a literal
/// `[[Name]]` in a guide stays literal.
pub struct FilePage<'a> {
    storage: &'a dyn Storage,
}

impl<'a> FilePage<'a> {
    /// Create a renderer reading documents from `storage`.
    #[must_use]
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Read and render one markdown document into a content fragment.
    ///
    /// The page title is extracted from the first H1, when present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document cannot be read. A document
    /// that was listed but has since disappeared aborts the build.
    pub fn render(&self, path: &str) -> Result<RenderResult, StorageError> {
        let markdown = self.storage.read(path)?;
        let mut renderer = MarkdownRenderer::new().with_title_extraction();
        Ok(renderer.render_markdown(&markdown))
    }
}

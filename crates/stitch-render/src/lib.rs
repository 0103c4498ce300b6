//! Markdown rendering for documentation pages.
//!
//! Converts markdown source into semantic HTML5 and extracts the page title
//! from the first H1 heading. Output is deterministic: the same input always
//! produces the same bytes.
//!
//! # Example
//!
//! ```
//! use stitch_render::MarkdownRenderer;
//!
//! let mut renderer = MarkdownRenderer::new().with_title_extraction();
//! let result = renderer.render_markdown("# Hello\n\n**Bold** text");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

mod renderer;
mod text;

pub use renderer::{MarkdownRenderer, RenderResult};
pub use text::{escape_html, first_heading, slugify, titlecase_from_slug};

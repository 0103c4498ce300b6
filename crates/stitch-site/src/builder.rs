//! Whole-tree site assembly.
//!
//! [`SiteBuilder`] drives one batch run through four strictly sequential
//! phases:
//!
//! 1. **Seed**: parse the digested metadata and populate the link registry,
//!    then apply configured external mappings.
//! 2. **Navigate**: discover guide and root documents, build the navigation
//!    block once.
//! 3. **Render**: render every class, guide, and root document page, each
//!    wrapped in the shared layout and written to the output storage.
//! 4. **Finalize**: write the stylesheet, copy static assets, produce the
//!    index page from the readme, and optionally dump the metadata tree.
//!
//! Any failure aborts the run. There is no retrying and no partial-success
//! mode; output already written stays where it is.

use std::collections::HashSet;
use std::sync::Arc;

use stitch_config::Config;
use stitch_links::LinkRegistry;
use stitch_model::{DigestedMetadata, MetadataError};
use stitch_render::{first_heading, titlecase_from_slug};
use stitch_storage::{Storage, StorageError, StorageErrorKind};

use crate::class_page::ClassPage;
use crate::file_page::FilePage;
use crate::nav::{NavEntry, Navigation, NavigationBuilder};
use crate::templates::{Layout, PageVars, STYLESHEET};

/// Error aborting a site build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Input or output storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Metadata parse or validation failure.
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
    /// Layout template failure.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Counts reported after a successful build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Pages written: classes, guides, root documents, and the index.
    pub pages: usize,
    /// Asset files written, the built-in stylesheet included.
    pub assets: usize,
}

/// A discovered markdown document with its derived page identity.
struct DocPage {
    /// Source path in the input storage.
    source: String,
    /// Output file name: stem plus the configured extension.
    output: String,
    /// Navigation title: first H1, else the titlecased stem.
    title: String,
}

/// Assembles a documentation site from digested metadata and markdown
/// sources.
///
/// Reads from one storage rooted at the project directory and writes to
/// another rooted at the output directory. One builder performs one run.
pub struct SiteBuilder {
    config: Config,
    source: Arc<dyn Storage>,
    dest: Arc<dyn Storage>,
    dump_metadata: Option<String>,
}

impl SiteBuilder {
    /// Create a builder over the given input and output storages.
    #[must_use]
    pub fn new(config: Config, source: Arc<dyn Storage>, dest: Arc<dyn Storage>) -> Self {
        Self {
            config,
            source,
            dest,
            dump_metadata: None,
        }
    }

    /// Also write the parsed metadata tree as JSON, at `path` relative to
    /// the output root.
    #[must_use]
    pub fn with_metadata_dump(mut self, path: impl Into<String>) -> Self {
        self.dump_metadata = Some(path.into());
        self
    }

    /// Run the whole-tree build.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on the first failure; output written before
    /// the failure is not cleaned up.
    pub fn build(&self) -> Result<BuildSummary, BuildError> {
        // Seed
        let metadata = self.load_metadata()?;
        let mut registry = LinkRegistry::new();
        registry.seed(&metadata);
        for (name, url) in &self.config.links {
            registry.add(name.clone(), url.clone());
        }
        tracing::info!(
            classes = metadata.len(),
            external = self.config.links.len(),
            "Link registry seeded"
        );

        // Navigate
        let guides = self.discover_guides()?;
        let root_docs = self.discover_root_docs()?;
        let nav = self.build_navigation(&metadata, &guides, &root_docs);
        tracing::info!(
            classes = metadata.len(),
            guides = guides.len(),
            files = root_docs.len(),
            "Navigation built"
        );

        // Render
        let layout = Layout::new()?;
        let mut pages = 0_usize;
        let mut outputs: HashSet<String> = HashSet::new();

        let class_page = ClassPage::new(&registry);
        for class in metadata.classes() {
            let fragment = class_page.render(class);
            let output = format!("{}{}", class.name, self.extension());
            check_collision(&mut outputs, &output);
            self.write_page(&layout, &nav, &output, Some(&class.name), &fragment)?;
            pages += 1;
        }

        let file_page = FilePage::new(self.source.as_ref());
        for doc in guides.iter().chain(&root_docs) {
            let result = file_page.render(&doc.source)?;
            let title = result.title.as_deref().unwrap_or(&doc.title);
            check_collision(&mut outputs, &doc.output);
            self.write_page(&layout, &nav, &doc.output, Some(title), &result.html)?;
            pages += 1;
        }
        tracing::info!(pages, "Pages rendered");

        // Finalize
        let assets = self.copy_assets()?;
        self.write_index(&layout, &nav)?;
        pages += 1;
        if let Some(path) = &self.dump_metadata {
            self.dest.write(path, metadata.to_json_pretty()?.as_bytes())?;
            tracing::info!(path = %path, "Metadata dumped");
        }

        tracing::info!(pages, assets, "Site build complete");
        Ok(BuildSummary { pages, assets })
    }

    fn extension(&self) -> &str {
        &self.config.output_resolved.extension
    }

    fn load_metadata(&self) -> Result<DigestedMetadata, BuildError> {
        let content = self.source.read(&self.config.input_resolved.metadata)?;
        Ok(DigestedMetadata::from_json(&content)?)
    }

    fn discover_guides(&self) -> Result<Vec<DocPage>, BuildError> {
        let listing = self.list_markdown(&self.config.input_resolved.guides_dir)?;
        listing.into_iter().map(|path| self.doc_page(path)).collect()
    }

    /// Root-level markdown documents, excluding the readme (it becomes the
    /// index page).
    fn discover_root_docs(&self) -> Result<Vec<DocPage>, BuildError> {
        let readme = &self.config.input_resolved.readme;
        let listing = self.list_markdown("")?;
        listing
            .into_iter()
            .filter(|path| path != readme)
            .map(|path| self.doc_page(path))
            .collect()
    }

    /// List markdown files directly inside `dir`. A missing directory is an
    /// empty listing, not a failure.
    fn list_markdown(&self, dir: &str) -> Result<Vec<String>, BuildError> {
        let listing = match self.source.list(dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == StorageErrorKind::NotFound => {
                tracing::debug!(dir = %dir, "No such directory, listing as empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(listing
            .into_iter()
            .filter(|path| path.ends_with(".md"))
            .collect())
    }

    fn doc_page(&self, source: String) -> Result<DocPage, BuildError> {
        let stem = doc_stem(&source);
        let title = match first_heading(&self.source.read(&source)?) {
            Some(title) => title,
            None => titlecase_from_slug(&stem.to_lowercase()),
        };
        Ok(DocPage {
            output: format!("{stem}{}", self.extension()),
            source,
            title,
        })
    }

    fn build_navigation(
        &self,
        metadata: &DigestedMetadata,
        guides: &[DocPage],
        root_docs: &[DocPage],
    ) -> Navigation {
        let ext = self.extension();
        let classes: Vec<NavEntry> = metadata
            .classes()
            .iter()
            .map(|class| NavEntry::new(class.name.clone(), format!("{}{ext}", class.name)))
            .collect();
        let guides: Vec<NavEntry> = guides.iter().map(doc_entry).collect();
        let files: Vec<NavEntry> = root_docs.iter().map(doc_entry).collect();

        NavigationBuilder::new(&self.config.site.nav).build(&classes, &guides, &files)
    }

    fn write_page(
        &self,
        layout: &Layout,
        nav: &Navigation,
        output: &str,
        page_title: Option<&str>,
        content: &str,
    ) -> Result<(), BuildError> {
        let html = layout.render(&PageVars {
            site_title: &self.config.site.title,
            site_version: &self.config.site.version,
            page_title,
            nav: &nav.composed,
            content,
        })?;
        self.dest.write(output, html.as_bytes())?;
        tracing::debug!(path = %output, "Wrote page");
        Ok(())
    }

    /// Write the built-in stylesheet, then copy user assets over it. A user
    /// file of the same name wins.
    fn copy_assets(&self) -> Result<usize, BuildError> {
        self.dest.write("assets/style.css", STYLESHEET.as_bytes())?;
        let mut assets = 1_usize;

        let dir = &self.config.input_resolved.assets_dir;
        let listing = match self.source.list_recursive(dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == StorageErrorKind::NotFound => {
                tracing::debug!(dir = %dir, "No assets directory");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("{dir}/");
        for path in listing {
            let rel = path.strip_prefix(&prefix).unwrap_or(&path);
            let contents = self.source.read_bytes(&path)?;
            self.dest.write(&format!("assets/{rel}"), &contents)?;
            assets += 1;
        }
        Ok(assets)
    }

    fn write_index(&self, layout: &Layout, nav: &Navigation) -> Result<(), BuildError> {
        let readme = &self.config.input_resolved.readme;
        let result = FilePage::new(self.source.as_ref()).render(readme)?;
        self.write_page(layout, nav, "index.html", result.title.as_deref(), &result.html)
    }
}

/// Record one output path, warning when an earlier page already claimed it.
///
/// The output layout is flat, so a guide, a root document, and a class can
/// share a stem; the later write replaces the earlier one.
fn check_collision(outputs: &mut HashSet<String>, output: &str) {
    if !outputs.insert(output.to_owned()) {
        tracing::warn!(path = %output, "Output path collision, page replaces an earlier one");
    }
}

/// File stem of a storage path: final segment minus the markdown extension.
fn doc_stem(path: &str) -> &str {
    let name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    name.strip_suffix(".md").unwrap_or(name)
}

fn doc_entry(doc: &DocPage) -> NavEntry {
    NavEntry::new(doc.title.clone(), doc.output.clone())
}

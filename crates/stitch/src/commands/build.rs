//! `stitch build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use stitch_config::{CliSettings, Config};
use stitch_site::SiteBuilder;
use stitch_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// File extension for generated pages, e.g. ".html" (overrides config).
    #[arg(short, long)]
    extension: Option<String>,

    /// Write the digested class metadata into the site as JSON
    /// (default path: metadata.json).
    #[arg(long, value_name = "PATH")]
    dump_metadata: Option<Option<String>>,

    /// Path to configuration file (default: auto-discover stitch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show build phase logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            extension: self.extension.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let output_dir = config.output_resolved.dir.clone();
        output.info(&format!("Project: {}", config.project_root.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        // Create storage for inputs and generated files
        let source: Arc<dyn Storage> = Arc::new(FsStorage::new(config.project_root.clone()));
        let dest: Arc<dyn Storage> = Arc::new(FsStorage::new(output_dir.clone()));

        let mut builder = SiteBuilder::new(config, source, dest);
        if let Some(dump) = self.dump_metadata {
            let path = dump.unwrap_or_else(|| "metadata.json".to_owned());
            builder = builder.with_metadata_dump(path);
        }

        let summary = builder.build()?;

        output.success(&format!(
            "Site built: {} pages, {} assets in {}",
            summary.pages,
            summary.assets,
            output_dir.display()
        ));
        Ok(())
    }
}

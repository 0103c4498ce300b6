//! Configuration management for Stitch.
//!
//! Parses `stitch.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Input paths (`metadata`, `guides_dir`, `readme`, `assets_dir`) are kept as
//! strings relative to the project root, which is the directory containing
//! the config file. The output directory is resolved to a full path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output page extension.
    pub extension: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "stitch.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site presentation configuration.
    pub site: SiteConfig,
    /// Input locations (paths are project-relative strings from TOML).
    input: InputConfigRaw,
    /// Output configuration.
    output: OutputConfigRaw,
    /// Extra symbol-to-URL mappings merged into the link registry after
    /// seeding. Later entries in the build replace earlier ones.
    pub links: BTreeMap<String, String>,

    /// Resolved input configuration (set after loading).
    #[serde(skip)]
    pub input_resolved: InputConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Project root, the directory containing the config file.
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Navigation section selector.
///
/// The navigation block is composed from these sections in the order they
/// appear in `site.nav`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavSection {
    /// Classes from the metadata file, in metadata order.
    Classes,
    /// Guide documents, in listing order.
    Guides,
    /// Root-level markdown files, in listing order.
    Files,
}

impl NavSection {
    /// Config token for this section.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Guides => "guides",
            Self::Files => "files",
        }
    }

    /// Section heading shown in the rendered navigation.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Classes => "Classes",
            Self::Guides => "Guides",
            Self::Files => "Files",
        }
    }
}

/// Site presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the page header.
    pub title: String,
    /// Project version shown next to the title. May be empty.
    pub version: String,
    /// Navigation sections, rendered in order.
    pub nav: Vec<NavSection>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            version: String::new(),
            nav: vec![NavSection::Classes],
        }
    }
}

/// Raw input configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InputConfigRaw {
    metadata: Option<String>,
    guides_dir: Option<String>,
    readme: Option<String>,
    assets_dir: Option<String>,
}

/// Resolved input locations, relative to the project root.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Class metadata JSON file.
    pub metadata: String,
    /// Directory holding guide markdown documents.
    pub guides_dir: String,
    /// Readme file used as the site index page.
    pub readme: String,
    /// Directory of static assets copied into the output.
    pub assets_dir: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            metadata: "metadata.json".to_owned(),
            guides_dir: "guides".to_owned(),
            readme: "README.md".to_owned(),
            assets_dir: "assets".to_owned(),
        }
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,
    /// Extension appended to entity page filenames. Empty by default so
    /// page filenames match the identity URLs used for cross-references.
    pub extension: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a path field to stay inside the project root.
fn require_relative(value: &str, field: &str) -> Result<(), ConfigError> {
    let path = Path::new(value);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path inside the project"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `stitch.toml` in the current directory and
    /// parents, falling back to defaults rooted at the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values. Validation
    /// runs last, over the settings actually in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
        }
        if let Some(extension) = &settings.extension {
            self.output_resolved.extension.clone_from(extension);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            input: InputConfigRaw::default(),
            output: OutputConfigRaw::default(),
            links: BTreeMap::new(),
            input_resolved: InputConfig::default(),
            output_resolved: OutputConfig {
                dir: base.join("site"),
                extension: String::new(),
            },
            project_root: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Resolve raw values against the config file directory.
    fn resolve(&mut self, config_dir: &Path) {
        let defaults = InputConfig::default();
        self.input_resolved = InputConfig {
            metadata: self.input.metadata.clone().unwrap_or(defaults.metadata),
            guides_dir: self.input.guides_dir.clone().unwrap_or(defaults.guides_dir),
            readme: self.input.readme.clone().unwrap_or(defaults.readme),
            assets_dir: self.input.assets_dir.clone().unwrap_or(defaults.assets_dir),
        };

        self.output_resolved = OutputConfig {
            dir: config_dir.join(self.output.dir.as_deref().unwrap_or("site")),
            extension: self.output.extension.clone().unwrap_or_default(),
        };

        self.project_root = config_dir.to_path_buf();
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid
    /// values. Called automatically at the end of [`load`](Self::load), after
    /// CLI settings have been applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_input()?;
        self.validate_output()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;

        for (i, section) in self.site.nav.iter().enumerate() {
            if self.site.nav[..i].contains(section) {
                return Err(ConfigError::Validation(format!(
                    "site.nav contains duplicate entry: {}",
                    section.key()
                )));
            }
        }

        Ok(())
    }

    /// Validate input locations.
    fn validate_input(&self) -> Result<(), ConfigError> {
        let input = &self.input_resolved;
        for (value, field) in [
            (&input.metadata, "input.metadata"),
            (&input.guides_dir, "input.guides_dir"),
            (&input.readme, "input.readme"),
            (&input.assets_dir, "input.assets_dir"),
        ] {
            require_non_empty(value, field)?;
            require_relative(value, field)?;
        }
        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        let extension = &self.output_resolved.extension;
        if !extension.is_empty() && !extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "output.extension must start with '.' (got \"{extension}\")"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.version, "");
        assert_eq!(config.site.nav, vec![NavSection::Classes]);
        assert_eq!(config.input_resolved.metadata, "metadata.json");
        assert_eq!(config.input_resolved.guides_dir, "guides");
        assert_eq!(config.input_resolved.readme, "README.md");
        assert_eq!(config.input_resolved.assets_dir, "assets");
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/site"));
        assert_eq!(config.output_resolved.extension, "");
        assert_eq!(config.project_root, PathBuf::from("/test"));
        assert!(config.links.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.nav, vec![NavSection::Classes]);
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
title = "Frob Engine"
version = "1.4.2"
nav = ["classes", "guides", "files"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Frob Engine");
        assert_eq!(config.site.version, "1.4.2");
        assert_eq!(
            config.site.nav,
            vec![NavSection::Classes, NavSection::Guides, NavSection::Files]
        );
    }

    #[test]
    fn test_parse_nav_rejects_unknown_section() {
        let toml = r#"
[site]
nav = ["classes", "changelog"]
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_links() {
        let toml = r#"
[links]
Widget = "https://example.com/widget"
Gadget = "https://example.com/gadget"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.links.get("Widget"),
            Some(&"https://example.com/widget".to_owned())
        );
        assert_eq!(
            config.links.get("Gadget"),
            Some(&"https://example.com/gadget".to_owned())
        );
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let toml = r#"
[input]
metadata = "api/classes.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.input_resolved.metadata, "api/classes.json");
        assert_eq!(config.input_resolved.guides_dir, "guides");
        assert_eq!(config.input_resolved.readme, "README.md");
        assert_eq!(config.output_resolved.dir, PathBuf::from("/project/site"));
        assert_eq!(config.project_root, PathBuf::from("/project"));
    }

    #[test]
    fn test_resolve_output_dir_relative() {
        let toml = r#"
[output]
dir = "public"
extension = ".html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.output_resolved.dir, PathBuf::from("/project/public"));
        assert_eq!(config.output_resolved.extension, ".html");
    }

    #[test]
    fn test_resolve_output_dir_absolute() {
        let toml = r#"
[output]
dir = "/var/www/docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(config.output_resolved.dir, PathBuf::from("/var/www/docs"));
    }

    #[test]
    fn test_apply_cli_settings_output_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output_resolved.dir, PathBuf::from("/custom/out"));
        assert_eq!(config.output_resolved.extension, ""); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            extension: Some(".html".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output_resolved.extension, ".html");
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/site")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.output_resolved.dir, config_before.output_resolved.dir);
        assert_eq!(
            config.output_resolved.extension,
            config_before.output_resolved.extension
        );
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = String::new();
        assert_validation_error(&config, &["site.title", "empty"]);
    }

    #[test]
    fn test_validate_nav_duplicate() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.nav = vec![NavSection::Classes, NavSection::Guides, NavSection::Classes];
        assert_validation_error(&config, &["site.nav", "duplicate", "classes"]);
    }

    #[test]
    fn test_validate_empty_nav_is_valid() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.nav = Vec::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_metadata_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.input_resolved.metadata = String::new();
        assert_validation_error(&config, &["input.metadata", "empty"]);
    }

    #[test]
    fn test_validate_readme_absolute_rejected() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.input_resolved.readme = "/etc/README.md".to_owned();
        assert_validation_error(&config, &["input.readme", "relative"]);
    }

    #[test]
    fn test_validate_guides_dir_parent_rejected() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.input_resolved.guides_dir = "../guides".to_owned();
        assert_validation_error(&config, &["input.guides_dir", "relative"]);
    }

    #[test]
    fn test_validate_extension_without_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.extension = "html".to_owned();
        assert_validation_error(&config, &["output.extension", "'.'"]);
    }

    #[test]
    fn test_validate_extension_with_dot_passes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.extension = ".html".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let err = Config::load(Some(Path::new("/nonexistent/stitch.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_and_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.toml");
        std::fs::write(
            &config_path,
            r#"
[site]
title = "Frob Engine"

[output]
dir = "public"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.site.title, "Frob Engine");
        assert_eq!(config.output_resolved.dir, dir.path().join("public"));
        assert_eq!(config.project_root, dir.path());
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.toml");
        std::fs::write(&config_path, "[site]\ntitle = \"Docs\"\n").unwrap();

        let settings = CliSettings {
            output_dir: Some(PathBuf::from("/custom/out")),
            extension: Some(".html".to_owned()),
        };
        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(config.output_resolved.dir, PathBuf::from("/custom/out"));
        assert_eq!(config.output_resolved.extension, ".html");
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.toml");
        std::fs::write(&config_path, "[output]\nextension = \"html\"\n").unwrap();

        let err = Config::load(Some(&config_path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.toml");
        std::fs::write(&config_path, "[site]\ntitle = \"Docs\"\n").unwrap();

        let settings = CliSettings {
            extension: Some("html".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&config_path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("output.extension"));
    }

    #[test]
    fn test_load_cli_extension_replaces_invalid_config_value() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stitch.toml");
        std::fs::write(&config_path, "[output]\nextension = \"html\"\n").unwrap();

        let settings = CliSettings {
            extension: Some(".html".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(config.output_resolved.extension, ".html");
    }

    #[test]
    fn test_nav_section_key_and_title() {
        assert_eq!(NavSection::Classes.key(), "classes");
        assert_eq!(NavSection::Guides.key(), "guides");
        assert_eq!(NavSection::Files.key(), "files");
        assert_eq!(NavSection::Classes.title(), "Classes");
        assert_eq!(NavSection::Guides.title(), "Guides");
        assert_eq!(NavSection::Files.title(), "Files");
    }
}

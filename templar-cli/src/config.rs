//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `templar.toml` files
//! and merging with command-line arguments.

use crate::error::{CliError, CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use templar::doc::{DEFAULT_BLOCK_TAGS, DEFAULT_CHILD_TAGS};
use templar::render::DEFAULT_INDENT;
use templar::{DocLayout, GeneratorOptions, Renderer};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "templar.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template discovery and dispatch.
    pub generator: GeneratorConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Source layout.
    pub layout: LayoutConfig,
}

/// Template discovery and dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Worker threads; `0` uses the available parallelism.
    pub workers: usize,

    /// Extension of template files.
    pub template_extension: String,

    /// Only templates matching this glob are run.
    pub include: Option<String>,

    /// Templates matching any of these globs are skipped.
    pub exclude: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory below `src/` receiving generated sources.
    pub generated_dir: String,

    /// Report what would change without writing.
    pub dry_run: bool,
}

/// Source layout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// One level of indentation.
    pub indent: String,

    /// HTML tags laid out as blocks in doc comments.
    pub block_tags: Vec<String>,

    /// Block tags that may directly follow their parent without a blank line.
    pub child_tags: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let defaults = GeneratorOptions::default();
        Self {
            workers: defaults.workers,
            template_extension: defaults.template_extension,
            include: defaults.include,
            exclude: defaults.exclude,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let defaults = GeneratorOptions::default();
        Self {
            generated_dir: defaults.generated_dir,
            dry_run: defaults.dry_run,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            block_tags: DEFAULT_BLOCK_TAGS.iter().map(|t| t.to_string()).collect(),
            child_tags: DEFAULT_CHILD_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Config {
    /// Generator options described by this configuration.
    pub fn generator_options(&self) -> Result<GeneratorOptions, ConfigError> {
        if self.generator.template_extension.is_empty() {
            return Err(ConfigError::invalid_value(
                "generator.template_extension",
                "must not be empty",
            ));
        }
        let dir = &self.output.generated_dir;
        if dir.is_empty() || dir.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConfigError::invalid_value(
                "output.generated_dir",
                "must be a single directory name",
            ));
        }

        Ok(GeneratorOptions {
            workers: self.generator.workers,
            template_extension: self.generator.template_extension.clone(),
            include: self.generator.include.clone(),
            exclude: self.generator.exclude.clone(),
            generated_dir: self.output.generated_dir.clone(),
            dry_run: self.output.dry_run,
            min_timestamp: None,
        })
    }

    /// Renderer using the configured layout.
    pub fn renderer(&self) -> Result<Renderer, ConfigError> {
        let indent = &self.layout.indent;
        if indent.is_empty() || !indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::invalid_value(
                "layout.indent",
                "must be a non-empty run of spaces or tabs",
            ));
        }

        for (key, tags) in [
            ("layout.block_tags", &self.layout.block_tags),
            ("layout.child_tags", &self.layout.child_tags),
        ] {
            if let Some(tag) = tags
                .iter()
                .find(|t| t.is_empty() || !t.chars().all(|c| c.is_ascii_alphanumeric()))
            {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{tag}' is not a valid tag name"),
                ));
            }
        }

        let layout = DocLayout::new(
            self.layout.block_tags.as_slice(),
            self.layout.child_tags.as_slice(),
        )
        .map_err(|e| ConfigError::invalid_value("layout", e.to_string()))?;
        Ok(Renderer::new(layout, indent.as_str()))
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path the default `templar.toml` is used when present and
    /// the built-in defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::not_found(path.to_path_buf()).into());
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(CONFIG_FILENAME);
                if !default.is_file() {
                    tracing::debug!("no {CONFIG_FILENAME} found, using defaults");
                    return Ok(Config::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(workers) = args.workers {
            config.generator.workers = workers;
        }

        if let Some(ref include) = args.include {
            config.generator.include = Some(include.clone());
        }

        if args.dry_run {
            config.output.dry_run = true;
        }

        config
    }

    /// Generator options for a run: configuration plus the arguments that
    /// only exist on the command line.
    pub fn options(config: &Config, args: &CliArgs) -> Result<GeneratorOptions, ConfigError> {
        let mut options = config.generator_options()?;
        options.min_timestamp = args
            .touch_after
            .map(|millis| SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(millis));
        Ok(options)
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# templar configuration file

[generator]
# Worker threads (0 = number of available cores)
workers = 0

# Extension of template files below the template root
template_extension = "rs"

# Only run templates whose relative path matches this glob
# include = "bean/**"

# Skip templates whose relative path matches any of these globs
exclude = ["**/mod.rs"]

[output]
# Directory below <module>/src/ receiving generated sources
generated_dir = "generated"

# Report what would change without writing any file
dry_run = false

[layout]
# One level of indentation
indent = "    "

# HTML tags laid out as blocks in doc comments
block_tags = ["div", "h1", "h2", "h3", "h4", "h5", "h6", "code", "table", "thead", "tfoot", "tbody", "td", "tr", "ul", "li", "ol", "dl", "dt", "dd"]

# Block tags that may follow their parent tag without a blank line
child_tags = ["tr", "thead", "tfoot", "tbody", "li", "dt", "dd"]
"#
    }
}

/// Fail before any work starts unless both positional paths are existing
/// directories.
pub fn require_dirs(templates: &Path, target: &Path) -> CliResult<()> {
    require_dir("template", templates)?;
    require_dir("target", target)
}

fn require_dir(role: &'static str, path: &Path) -> CliResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::invalid_path(role, path.to_path_buf()))
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Worker count override.
    pub workers: Option<usize>,

    /// Include glob override.
    pub include: Option<String>,

    /// Force a dry run.
    pub dry_run: bool,

    /// Bump unchanged files past this many milliseconds since the epoch.
    pub touch_after: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.workers, 0);
        assert_eq!(config.generator.template_extension, "rs");
        assert_eq!(config.generator.exclude, vec!["**/mod.rs".to_string()]);
        assert!(config.generator.include.is_none());
        assert_eq!(config.output.generated_dir, "generated");
        assert!(!config.output.dry_run);
        assert_eq!(config.layout.indent, "    ");
        assert!(config.layout.block_tags.contains(&"table".to_string()));
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let parsed: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.generator.exclude, defaults.generator.exclude);
        assert_eq!(parsed.output.generated_dir, defaults.output.generated_dir);
        assert_eq!(parsed.layout.indent, defaults.layout.indent);
        assert_eq!(parsed.layout.block_tags, defaults.layout.block_tags);
        assert_eq!(parsed.layout.child_tags, defaults.layout.child_tags);
    }

    #[test]
    fn test_merge_cli_args() {
        let config = Config::default();
        let args = CliArgs {
            workers: Some(3),
            include: Some("bean/**".to_string()),
            dry_run: true,
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.generator.workers, 3);
        assert_eq!(merged.generator.include.as_deref(), Some("bean/**"));
        assert!(merged.output.dry_run);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let mut config = Config::default();
        config.generator.workers = 5;
        config.output.dry_run = true;

        let merged = ConfigManager::merge_cli_args(config, &CliArgs::default());
        assert_eq!(merged.generator.workers, 5);
        assert!(merged.output.dry_run);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[generator]
workers = 2
include = "util/**"

[output]
generated_dir = "gen"

[layout]
indent = "\t"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.workers, 2);
        assert_eq!(config.generator.include.as_deref(), Some("util/**"));
        assert_eq!(config.generator.exclude, vec!["**/mod.rs".to_string()]);
        assert_eq!(config.output.generated_dir, "gen");
        assert_eq!(config.layout.indent, "\t");

        let options = config.generator_options().unwrap();
        assert_eq!(options.generated_dir, "gen");
        assert!(config.renderer().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.layout.indent = "xx".to_string();
        assert!(matches!(
            config.renderer().unwrap_err(),
            ConfigError::InvalidValue { ref key, .. } if key == "layout.indent"
        ));

        let mut config = Config::default();
        config.layout.block_tags.push("a|b".to_string());
        assert!(matches!(
            config.renderer().unwrap_err(),
            ConfigError::InvalidValue { ref key, .. } if key == "layout.block_tags"
        ));

        let mut config = Config::default();
        config.output.generated_dir = "a/b".to_string();
        assert!(config.generator_options().is_err());
    }

    #[test]
    fn test_touch_after_becomes_min_timestamp() {
        let args = CliArgs {
            touch_after: Some(1_500),
            ..Default::default()
        };
        let options = ConfigManager::options(&Config::default(), &args).unwrap();
        assert_eq!(
            options.min_timestamp,
            Some(SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(1_500))
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let result = ConfigManager::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(
            result.unwrap_err(),
            crate::error::CliError::Config(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("templar.toml");
        std::fs::write(&path, "[generator\nworkers = ").unwrap();

        let result = ConfigManager::load(Some(&path));
        assert!(matches!(
            result.unwrap_err(),
            crate::error::CliError::Config(ConfigError::InvalidToml { .. })
        ));
    }
}

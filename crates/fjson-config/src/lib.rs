//! Configuration management for fjson.
//!
//! Parses `fjson.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path and identifier values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `build.meta_file`
//! - `build.html_dir`
//! - `build.output_dir`
//! - `build.root_id`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override metadata store dump path.
    pub meta_file: Option<PathBuf>,
    /// Override rendered HTML directory.
    pub html_dir: Option<PathBuf>,
    /// Override output directory for `.fjson` records.
    pub output_dir: Option<PathBuf>,
    /// Override root document identifier.
    pub root_id: Option<String>,
    /// Override parallel processing flag.
    pub parallel: Option<bool>,
    /// Override pretty-printing flag.
    pub pretty: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fjson.toml";

/// Conventional identifier of the top-level index document.
const DEFAULT_ROOT_ID: &str = "index";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    meta_file: Option<String>,
    html_dir: Option<String>,
    output_dir: Option<String>,
    root_id: Option<String>,
    parallel: Option<bool>,
    pretty: Option<bool>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// JSON dump of the metadata store produced by the parsing stage.
    pub meta_file: PathBuf,
    /// Directory holding the rendered `{id}.html` pages.
    pub html_dir: PathBuf,
    /// Directory receiving the `{id}.fjson` records.
    pub output_dir: PathBuf,
    /// Identifier of the top-level index document.
    pub root_id: String,
    /// Whether documents are assembled in parallel.
    pub parallel: bool,
    /// Whether records are pretty-printed.
    pub pretty: bool,
}

impl BuildConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            meta_file: base.join("metas.json"),
            html_dir: base.join("html"),
            output_dir: base.join("html"),
            root_id: DEFAULT_ROOT_ID.to_owned(),
            parallel: true,
            pretty: true,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.html_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_BUILD`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `fjson.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let build = &mut self.build_resolved;
        if let Some(meta_file) = &settings.meta_file {
            build.meta_file.clone_from(meta_file);
        }
        if let Some(html_dir) = &settings.html_dir {
            build.html_dir.clone_from(html_dir);
            // Records land next to the pages unless an output dir is given
            if settings.output_dir.is_none() && self.build.output_dir.is_none() {
                build.output_dir.clone_from(html_dir);
            }
        }
        if let Some(output_dir) = &settings.output_dir {
            build.output_dir.clone_from(output_dir);
        }
        if let Some(root_id) = &settings.root_id {
            build.root_id.clone_from(root_id);
        }
        if let Some(parallel) = settings.parallel {
            build.parallel = parallel;
        }
        if let Some(pretty) = settings.pretty {
            build.pretty = pretty;
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
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig::with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.build_resolved.root_id, "build.root_id")?;
        if self.build_resolved.meta_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "build.meta_file cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let build = &mut self.build;
        for (value, field) in [
            (&mut build.meta_file, "build.meta_file"),
            (&mut build.html_dir, "build.html_dir"),
            (&mut build.output_dir, "build.output_dir"),
            (&mut build.root_id, "build.root_id"),
        ] {
            if let Some(raw) = value.as_deref() {
                *value = Some(expand::expand_env(raw, field)?);
            }
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// `output_dir` falls back to `html_dir` so records are written next to
    /// the rendered pages.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let html_dir = resolve(self.build.html_dir.as_deref(), "html");
        let output_dir = self
            .build
            .output_dir
            .as_deref()
            .map_or_else(|| html_dir.clone(), |dir| config_dir.join(dir));

        self.build_resolved = BuildConfig {
            meta_file: resolve(self.build.meta_file.as_deref(), "metas.json"),
            html_dir,
            output_dir,
            root_id: self
                .build
                .root_id
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_ID.to_owned()),
            parallel: self.build.parallel.unwrap_or(true),
            pretty: self.build.pretty.unwrap_or(true),
        };
    }
}

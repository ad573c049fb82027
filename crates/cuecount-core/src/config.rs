//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with built-in defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `cuecount.<ext>` in current directory or any parent
//! - `.cuecount.<ext>` in current directory or any parent
//! - `~/.config/cuecount/config.<ext>` (user config)
//!
//! When multiple files exist in the same directory, all are merged via figment.
//! Later extensions override earlier: toml < yaml < yml < json.
//! `CUECOUNT_*` environment variables override every file.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use cuecount_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! assert_eq!(config.top_n, 5);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::chart::ChartStyle;
use crate::error::{ConfigError, ConfigResult};
use crate::frequency::FrequencyOptions;
use crate::parser::ParseOptions;

/// Default minimum vocabulary size (exclusive) for a character to be ranked.
pub const DEFAULT_VOCABULARY_THRESHOLD: usize = 100;

/// Default number of ranked words per character.
pub const DEFAULT_TOP_N: usize = 5;

/// Default upper bound of the chart frequency axis.
pub const DEFAULT_Y_AXIS_MAX: u32 = 28;

/// Default chart grid: rows of panels.
pub const DEFAULT_PANEL_ROWS: usize = 3;

/// Default chart grid: panels per row.
pub const DEFAULT_PANEL_COLS: usize = 2;

/// Default bar colors, cycled per character.
pub const DEFAULT_PALETTE: &[&str] = &["red", "green", "SlateBlue", "yellow", "violet", "brown"];

/// Order in which characters are visited when building the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CharacterOrder {
    /// Order of each character's first cue in the script.
    #[default]
    FirstSeen,
    /// Lexicographic order of the lowercase name.
    Alphabetical,
}

impl CharacterOrder {
    /// Returns the order as a kebab-case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSeen => "first-seen",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl std::fmt::Display for CharacterOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configuration for cuecount.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON). Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Directory receiving the dump, character files, table and chart.
    ///
    /// Defaults to the current directory.
    pub output_dir: Option<Utf8PathBuf>,
    /// A character is ranked only with strictly more distinct words than this.
    pub vocabulary_threshold: usize,
    /// Number of ranked words kept per character.
    pub top_n: usize,
    /// Upper bound of the chart frequency axis.
    pub y_axis_max: u32,
    /// Rows of panels in the chart grid.
    pub panel_rows: usize,
    /// Panels per row in the chart grid.
    pub panel_cols: usize,
    /// Bar colors (SVG color names or `#rrggbb`), cycled per character.
    pub palette: Vec<String>,
    /// Order in which characters appear in the table and chart.
    pub character_order: CharacterOrder,
    /// Keep a second `": "` inside dialogue instead of rejecting the cue.
    pub allow_extra_separators: bool,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            output_dir: None,
            vocabulary_threshold: DEFAULT_VOCABULARY_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            y_axis_max: DEFAULT_Y_AXIS_MAX,
            panel_rows: DEFAULT_PANEL_ROWS,
            panel_cols: DEFAULT_PANEL_COLS,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            character_order: CharacterOrder::default(),
            allow_extra_separators: false,
            max_input_bytes: None,
            disable_input_limit: false,
        }
    }
}

impl Config {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.panel_cols == 0 {
            return Err(ConfigError::Invalid {
                field: "panel_cols",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.y_axis_max == 0 {
            return Err(ConfigError::Invalid {
                field: "y_axis_max",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid {
                field: "palette",
                reason: "needs at least one color".to_string(),
            });
        }
        Ok(())
    }

    /// Effective input size limit, `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            self.max_input_bytes.or(Some(crate::DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// Effective output directory.
    pub fn output_dir(&self) -> &Utf8Path {
        self.output_dir
            .as_deref()
            .unwrap_or_else(|| Utf8Path::new("."))
    }

    /// Parser settings derived from this config.
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            allow_extra_separators: self.allow_extra_separators,
        }
    }

    /// Ranking settings derived from this config.
    pub const fn frequency_options(&self) -> FrequencyOptions {
        FrequencyOptions {
            vocabulary_threshold: self.vocabulary_threshold,
            top_n: self.top_n,
            order: self.character_order,
        }
    }

    /// Chart settings derived from this config.
    pub fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            y_axis_max: self.y_axis_max,
            rows: self.panel_rows,
            cols: self.panel_cols,
            palette: self.palette.clone(),
            top_n: self.top_n,
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "cuecount";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/cuecount/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `CUECOUNT_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/cuecount/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // CUECOUNT_TOP_N=3, CUECOUNT_LOG_LEVEL=debug, etc.
        figment = figment.merge(Env::prefixed("CUECOUNT_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        config.validate()?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            top_n = config.top_n,
            vocabulary_threshold = config.vocabulary_threshold,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching files from the closest directory that has any
    /// match, dotfiles before regular files.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;

        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/cuecount/` on Linux, `~/Library/Application Support/cuecount/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

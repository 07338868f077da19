//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, directory, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A color name could not be parsed.
    #[error("Invalid color '{value}' for {slot}")]
    InvalidColor {
        /// Which palette entry, e.g. `highlight.bg`.
        slot: String,
        /// The rejected value.
        value: String,
    },
}

/// Foreground/background pair as written in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColorPair {
    /// Foreground color name (e.g. "black", "#ffcc00").
    pub fg: String,
    /// Background color name.
    pub bg: String,
}

impl ColorPair {
    fn new(fg: &str, bg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
        }
    }
}

/// `[colors]` section of the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ColorsSection {
    /// Static context lines.
    #[serde(default)]
    pub normal: Option<ColorPair>,
    /// Typed region lines.
    #[serde(default)]
    pub highlight: Option<ColorPair>,
    /// Window background and gutter.
    #[serde(default)]
    pub background: Option<ColorPair>,
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/typeshow/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Seconds between typed characters.
    #[serde(default)]
    pub delay: Option<f64>,

    /// Milliseconds per scroll animation frame.
    #[serde(default)]
    pub scroll_delay_ms: Option<u64>,

    /// Adjusted line shown at the top of the first screen.
    #[serde(default)]
    pub page: Option<usize>,

    /// Columns reserved for line numbers.
    #[serde(default)]
    pub gutter_width: Option<u16>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Color scheme overrides.
    #[serde(default)]
    pub colors: Option<ColorsSection>,
}

/// Resolved color scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    /// Static context lines.
    pub normal: ColorPair,
    /// Typed region lines.
    pub highlight: ColorPair,
    /// Window background and gutter.
    pub background: ColorPair,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            normal: ColorPair::new("black", "white"),
            highlight: ColorPair::new("black", "cyan"),
            background: ColorPair::new("black", "white"),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Seconds between typed characters; `None` types instantly.
    pub delay: Option<f64>,
    /// Milliseconds per scroll animation frame.
    pub scroll_delay_ms: u64,
    /// Adjusted line shown at the top of the first screen.
    pub page: usize,
    /// Columns reserved for line numbers.
    pub gutter_width: u16,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Colors for normal, highlight and background.
    pub colors: ColorScheme,
    /// Render without colors.
    pub no_color: bool,
}

/// Smallest gutter that still fits a digit and a separator.
pub const MIN_GUTTER_WIDTH: u16 = 2;

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            delay: None,
            scroll_delay_ms: 30,
            page: 1,
            gutter_width: 4,
            log_file_path: default_log_path(),
            colors: ColorScheme::default(),
            no_color: false,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/typeshow/typeshow.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("typeshow").join("typeshow.log")
    } else {
        PathBuf::from("typeshow.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/typeshow/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("typeshow").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TYPESHOW_CONFIG` environment variable
/// 3. Default path `~/.config/typeshow/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("TYPESHOW_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Accept only delays that can become a `Duration`.
pub fn valid_delay(delay: f64) -> Option<f64> {
    Duration::try_from_secs_f64(delay).ok().map(|_| delay)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
/// Out-of-range values (negative delays, zero page, tiny gutters) fall back to defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let colors = config.colors.unwrap_or_default();

    ResolvedConfig {
        delay: config.delay.and_then(valid_delay).or(defaults.delay),
        scroll_delay_ms: config.scroll_delay_ms.unwrap_or(defaults.scroll_delay_ms),
        page: config
            .page
            .filter(|page| *page >= 1)
            .unwrap_or(defaults.page),
        gutter_width: config
            .gutter_width
            .filter(|width| *width >= MIN_GUTTER_WIDTH)
            .unwrap_or(defaults.gutter_width),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        colors: ColorScheme {
            normal: colors.normal.unwrap_or(defaults.colors.normal),
            highlight: colors.highlight.unwrap_or(defaults.colors.highlight),
            background: colors.background.unwrap_or(defaults.colors.background),
        },
        no_color: defaults.no_color,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `TYPESHOW_DELAY`: typing delay in seconds (ignored unless a valid number)
/// - `TYPESHOW_LOG_FILE`: log file path
/// - `NO_COLOR`: any value disables colors
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(delay) = std::env::var("TYPESHOW_DELAY")
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .and_then(valid_delay)
    {
        config.delay = Some(delay);
    }

    if let Ok(path) = std::env::var("TYPESHOW_LOG_FILE") {
        config.log_file_path = PathBuf::from(path);
    }

    if std::env::var_os("NO_COLOR").is_some() {
        config.no_color = true;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    delay_override: Option<f64>,
    page_override: Option<usize>,
    no_color_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(delay) = delay_override.and_then(valid_delay) {
        config.delay = Some(delay);
    }

    if let Some(page) = page_override.filter(|page| *page >= 1) {
        config.page = page;
    }

    if let Some(no_color) = no_color_override {
        config.no_color = no_color;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_typeshow_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("typeshow.log"),
            "Default log path should end with 'typeshow.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(resolved.log_file_path, custom_path);
    }
}

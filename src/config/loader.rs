//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::state::search::SearchInEventsInputs;
use crate::view_state::virtual_list::DEFAULT_OVERSCAN;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "EVSHEET_CONFIG";

/// Environment variable overriding case-sensitive matching.
pub const MATCH_CASE_ENV_VAR: &str = "EVSHEET_MATCH_CASE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/evsheet/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Rows rendered above and below the viewport.
    #[serde(default)]
    pub overscan_count: Option<usize>,

    /// Height assumed for rows not measured yet.
    #[serde(default)]
    pub default_row_height: Option<usize>,

    /// Viewport height in lines.
    #[serde(default)]
    pub viewport_height: Option<usize>,

    /// Columns per nesting level when estimating wrapped heights.
    #[serde(default)]
    pub indent_width: Option<usize>,

    /// Columns available to event text. When set, unmeasured rows are
    /// estimated from their wrapped text instead of `default_row_height`.
    #[serde(default)]
    pub text_width: Option<usize>,

    /// Case-sensitive search.
    #[serde(default)]
    pub match_case: Option<bool>,

    /// Default search scopes.
    #[serde(default)]
    pub search: Option<SearchScopeSection>,
}

/// Search scope section from TOML.
///
/// ```toml
/// [search]
/// conditions = true
/// actions = true
/// event_strings = false
/// event_sentences = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SearchScopeSection {
    /// Search in condition parameters.
    #[serde(default)]
    pub conditions: Option<bool>,
    /// Search in action parameters.
    #[serde(default)]
    pub actions: Option<bool>,
    /// Search in event strings (comments, group names).
    #[serde(default)]
    pub event_strings: Option<bool>,
    /// Search in instruction sentences.
    #[serde(default)]
    pub event_sentences: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Overscan rows.
    pub overscan_count: usize,
    /// Estimated row height.
    pub default_row_height: usize,
    /// Viewport height.
    pub viewport_height: usize,
    /// Indent width.
    pub indent_width: usize,
    /// Text width for wrapped height estimates.
    pub text_width: Option<usize>,
    /// Case-sensitive search.
    pub match_case: bool,
    /// Search in conditions.
    pub search_in_conditions: bool,
    /// Search in actions.
    pub search_in_actions: bool,
    /// Search in event strings.
    pub search_in_event_strings: bool,
    /// Search in sentences.
    pub search_in_event_sentences: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_path(),
            overscan_count: DEFAULT_OVERSCAN,
            default_row_height: 1,
            viewport_height: 24,
            indent_width: 3,
            text_width: None,
            match_case: false,
            search_in_conditions: true,
            search_in_actions: true,
            search_in_event_strings: true,
            search_in_event_sentences: true,
        }
    }
}

impl ResolvedConfig {
    /// Search inputs for `text` using the configured defaults.
    pub fn search_inputs(&self, text: impl Into<String>) -> SearchInEventsInputs {
        SearchInEventsInputs {
            search_in_conditions: self.search_in_conditions,
            search_in_actions: self.search_in_actions,
            search_in_event_strings: self.search_in_event_strings,
            search_in_event_sentences: self.search_in_event_sentences,
            ..SearchInEventsInputs::new(text).match_case(self.match_case)
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/evsheet/evsheet.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("evsheet").join("evsheet.log")
    } else {
        PathBuf::from("evsheet.log")
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
/// Returns `~/.config/evsheet/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("evsheet").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `EVSHEET_CONFIG` environment variable
/// 3. Default path `~/.config/evsheet/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed,
/// or if `EVSHEET_CONFIG` is not valid Unicode.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `EVSHEET_MATCH_CASE`: `1`/`true`/`yes` or `0`/`false`/`no`; other values are ignored
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(MATCH_CASE_ENV_VAR) {
        if let Some(match_case) = parse_flag(&value) {
            config.match_case = match_case;
        }
    }

    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };
    let search = config.search.unwrap_or_default();

    ResolvedConfig {
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        overscan_count: config.overscan_count.unwrap_or(defaults.overscan_count),
        default_row_height: config
            .default_row_height
            .unwrap_or(defaults.default_row_height),
        viewport_height: config.viewport_height.unwrap_or(defaults.viewport_height),
        indent_width: config.indent_width.unwrap_or(defaults.indent_width),
        text_width: config.text_width.or(defaults.text_width),
        match_case: config.match_case.unwrap_or(defaults.match_case),
        search_in_conditions: search.conditions.unwrap_or(defaults.search_in_conditions),
        search_in_actions: search.actions.unwrap_or(defaults.search_in_actions),
        search_in_event_strings: search
            .event_strings
            .unwrap_or(defaults.search_in_event_strings),
        search_in_event_sentences: search
            .event_sentences
            .unwrap_or(defaults.search_in_event_sentences),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    match_case_override: Option<bool>,
    height_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(match_case) = match_case_override {
        config.match_case = match_case;
    }

    if let Some(height) = height_override {
        config.viewport_height = height;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file is
//! optional and lives in the content root; stock defaults fill in anything
//! it leaves out.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "content"      # Path to content directory
//!
//! [search]
//! fields = ["title", "summary"] # Fields matched by the search box (title always)
//! defer_threshold = 64          # Collections this large filter off the input path
//!
//! [processing]
//! max_processes = 4             # Max rayon workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [search]
//! defer_threshold = 500
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// Path to the content root directory.
    #[serde(default = "default_content_root")]
    pub content_root: String,
    /// Search box behavior.
    pub search: SearchConfig,
    /// Background worker settings.
    pub processing: ProcessingConfig,
}

fn default_content_root() -> String {
    "content".to_string()
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            search: SearchConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.defer_threshold == 0 {
            return Err(ConfigError::Validation(
                "search.defer_threshold must be at least 1".into(),
            ));
        }
        for field in &self.search.fields {
            if !SEARCH_FIELDS.contains(&field.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "search.fields: unknown field '{field}' (expected one of {})",
                    SEARCH_FIELDS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Field names accepted in `search.fields`.
pub const SEARCH_FIELDS: &[&str] = &["title", "summary", "tags"];

/// Search box settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Item fields matched against the query. `title` is matched even when
    /// omitted here.
    pub fields: Vec<String>,
    /// Collections with at least this many items are filtered on the rayon
    /// pool; smaller ones are filtered inline.
    pub defer_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: vec!["title".to_string(), "summary".to_string()],
            defer_threshold: 64,
        }
    }
}

/// Background worker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of rayon workers used for deferred filtering.
    /// When absent, defaults to the number of CPU cores.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never less than one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FolioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<FolioConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: FolioConfig = merged.try_into()?;
    config.validate()?;
    tracing::debug!(root = %root.display(), "loaded config");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Path to content directory
content_root = "content"

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Fields matched by the search box. The title is always matched.
# Allowed values: "title", "summary", "tags".
fields = ["title", "summary"]

# Collections with at least this many items are filtered in the background;
# smaller ones are filtered inline on every keystroke.
defer_threshold = 64

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum background workers used for deferred filtering.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

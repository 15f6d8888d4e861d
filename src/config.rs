//! Project configuration module.
//!
//! Handles loading, validating, and merging `showtimes.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [dirs]
//! input = "src"                   # Site source root
//! output = "public"               # Where exported views are written
//! # includes = "src/_includes"    # Optional template includes override
//! listings = "_data/movies.json"  # Listings file, relative to `input`
//!
//! [filters]
//! date_format = "compact"         # "compact" (YYYYMMDD) or "dashed" (YYYY-MM-DD)
//!
//! [scrape]
//! date_format = "%A %d, %B %Y"    # chrono format of scraped dates (+ year)
//! time_format = "%I:%M %p"        # chrono format of scraped times
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::DateFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
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

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "showtimes.toml";

/// Configuration loaded from `showtimes.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory layout shared with the site generator.
    pub dirs: DirsConfig,
    /// Filter behaviour.
    pub filters: FiltersConfig,
    /// Formats of scraped date/time text.
    pub scrape: ScrapeConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dirs.input.trim().is_empty() {
            return Err(ConfigError::Validation("dirs.input must not be empty".into()));
        }
        if self.dirs.output.trim().is_empty() {
            return Err(ConfigError::Validation("dirs.output must not be empty".into()));
        }
        if self.dirs.input == self.dirs.output {
            return Err(ConfigError::Validation(
                "dirs.input and dirs.output must differ".into(),
            ));
        }
        if self.dirs.listings.trim().is_empty() {
            return Err(ConfigError::Validation(
                "dirs.listings must not be empty".into(),
            ));
        }
        if !self.scrape.date_format.contains("%Y") {
            return Err(ConfigError::Validation(
                "scrape.date_format must end with a %Y year field".into(),
            ));
        }
        if self.scrape.time_format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "scrape.time_format must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirsConfig {
    pub input: String,
    pub output: String,
    /// Template includes override; the site generator's default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<String>,
    /// Listings file, relative to `input`.
    pub listings: String,
}

impl DirsConfig {
    pub fn listings_path(&self) -> PathBuf {
        Path::new(&self.input).join(&self.listings)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output)
    }
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            input: "src".to_string(),
            output: "public".to_string(),
            includes: None,
            listings: "_data/movies.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    /// Input convention of dates handed to `format_date`.
    pub date_format: DateFormat,
}

/// chrono format strings for scraped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    pub date_format: String,
    pub time_format: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            date_format: "%A %d, %B %Y".to_string(),
            time_format: "%I:%M %p".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `showtimes.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Showtimes Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directories (shared with the site generator)
# ---------------------------------------------------------------------------
[dirs]
# Site source root.
input = "src"

# Where `showtimes export` writes by_date.json and by_title.json.
output = "public"

# Template includes override. Omit to use the site generator's default.
# includes = "src/_includes"

# Listings file written by the scraper, relative to `input`.
listings = "_data/movies.json"

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
[filters]
# Input convention for format-date:
#   "compact" -> 20250614
#   "dashed"  -> 2025-06-14
date_format = "compact"

# ---------------------------------------------------------------------------
# Scraped text (chrono format strings)
# ---------------------------------------------------------------------------
[scrape]
# Scraped dates carry no year; the inferred year is appended before parsing,
# so this format must end with %Y.
date_format = "%A %d, %B %Y"

# Scraped showtimes, e.g. "7:30 PM".
time_format = "%I:%M %p"
"##
}

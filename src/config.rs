//! Configuration module.
//!
//! Handles loading, validating, and merging `negapost.toml`. Stock defaults
//! are overridden by the user file; command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [adjustments]
//! exposure = 1.0            # Starting exposure gain
//! contrast = 0.0            # Starting contrast (-1.0 .. 1.0)
//! mask_strength = 0.0       # Starting orange-mask correction
//! red = 1.0                 # Starting channel multipliers
//! green = 1.0
//! blue = 1.0
//! mode = "color"            # "color" or "bw"
//!
//! [limits]
//! max_file_bytes = 52428800 # Reject sources larger than this (50 MiB)
//! max_dimension = 10000     # Reject sources wider or taller than this
//!
//! [output]
//! filename = "negapost-memory.png"  # Export name when none is given
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [adjustments]
//! mask_strength = 0.4
//! ```
//!
//! Unknown keys are rejected to catch typos early. Adjustments here are only
//! the starting values of the controls; nothing is ever written back.

use crate::imaging::supported_output_extensions;
use crate::params::Mode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "negapost.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `negapost.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Starting values of the adjustment controls.
    pub adjustments: AdjustmentsConfig,
    /// Loader validation limits.
    pub limits: LimitsConfig,
    /// Export settings.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.adjustments;
        for (key, value) in [
            ("exposure", a.exposure),
            ("contrast", a.contrast),
            ("mask_strength", a.mask_strength),
            ("red", a.red),
            ("green", a.green),
            ("blue", a.blue),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "adjustments.{key} must be a finite number"
                )));
            }
        }
        if self.limits.max_file_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_file_bytes must be non-zero".into(),
            ));
        }
        if self.limits.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "limits.max_dimension must be non-zero".into(),
            ));
        }
        if self.output.filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.filename must not be empty".into(),
            ));
        }
        let ext = Path::new(&self.output.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !supported_output_extensions().contains(&ext.as_str()) {
            return Err(ConfigError::Validation(format!(
                "output.filename must end in one of: {}",
                supported_output_extensions().join(", ")
            )));
        }
        Ok(())
    }
}

/// Starting control values. Defaults are the neutral parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustmentsConfig {
    pub exposure: f32,
    pub contrast: f32,
    pub mask_strength: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub mode: Mode,
}

impl Default for AdjustmentsConfig {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            contrast: 0.0,
            mask_strength: 0.0,
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            mode: Mode::Color,
        }
    }
}

/// Loader validation limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest accepted source file, in bytes.
    pub max_file_bytes: u64,
    /// Largest accepted width or height, in pixels.
    pub max_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 50 * 1024 * 1024,
            max_dimension: 10_000,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name used when `-o` is not given. The extension picks the encoder.
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "negapost-memory.png".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
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
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `negapost.toml` in the given directory.
///
/// A missing file yields the stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(&dir.join(CONFIG_FILE))?)
}

/// Load config from an explicit file path. The file must exist.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `negapost.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# negapost Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# negapost reads ./negapost.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Starting adjustments
# ---------------------------------------------------------------------------
[adjustments]
# Multiplicative brightness gain applied after inversion.
exposure = 1.0

# Contrast around mid-gray. 0.0 is flat, 1.0 is very steep.
# Values at or above ~1.016 become a hard threshold at mid-gray.
contrast = 0.0

# Orange-mask correction strength (color mode only).
# 0.0 still divides green by 0.5 and blue by 0.2.
mask_strength = 0.0

# Per-channel multipliers after inversion (color mode only).
red = 1.0
green = 1.0
blue = 1.0

# "color" for color negatives, "bw" to average channels to gray.
mode = "color"

# ---------------------------------------------------------------------------
# Loader limits
# ---------------------------------------------------------------------------
[limits]
# Largest accepted source file in bytes (50 MiB).
max_file_bytes = 52428800

# Largest accepted width or height in pixels.
max_dimension = 10000

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[output]
# File written when no output path is given.
# The extension picks the format: png, jpg/jpeg, tif/tiff, webp.
filename = "negapost-memory.png"
"##
}

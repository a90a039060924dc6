//! Viewer configuration module.
//!
//! Handles loading, validating, and merging `folio.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so
//! a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_path = "content.json"  # Where the content document is fetched from
//!
//! [lazy_load]
//! root_margin_px = 200           # Load images this far before they scroll into view
//!
//! [lightbox]
//! swipe_threshold_px = 50        # Minimum horizontal drag that counts as a swipe
//!
//! [routes]
//! unknown = "home"               # Page shown for unrecognized routes
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::lazyload::DEFAULT_ROOT_MARGIN_PX;
use crate::lightbox::DEFAULT_SWIPE_THRESHOLD_PX;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Viewer configuration loaded from `folio.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Path of the content document.
    #[serde(default = "default_content_path")]
    pub content_path: String,
    /// Lazy image loading.
    pub lazy_load: LazyLoadConfig,
    /// Lightbox input handling.
    pub lightbox: LightboxConfig,
    /// Route dispatch policy.
    pub routes: RoutesConfig,
}

fn default_content_path() -> String {
    "content.json".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            content_path: default_content_path(),
            lazy_load: LazyLoadConfig::default(),
            lightbox: LightboxConfig::default(),
            routes: RoutesConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let margin = self.lazy_load.root_margin_px;
        if !margin.is_finite() || margin < 0.0 {
            return Err(ConfigError::Validation(
                "lazy_load.root_margin_px must be a non-negative number".into(),
            ));
        }
        let threshold = self.lightbox.swipe_threshold_px;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "lightbox.swipe_threshold_px must be positive".into(),
            ));
        }
        if self.content_path.is_empty() {
            return Err(ConfigError::Validation(
                "content_path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyLoadConfig {
    /// Distance in pixels around the viewport at which images start loading.
    pub root_margin_px: f64,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Horizontal drag distance in pixels that counts as a swipe.
    pub swipe_threshold_px: f64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Where unrecognized top-level routes land.
    pub unknown: UnknownRoute,
}

/// Fallback for unrecognized routes. Home is the only supported target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRoute {
    #[default]
    Home,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ViewerConfig::default()).expect("default config must serialize")
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
) -> Result<ViewerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `folio.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<ViewerConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE))
}

/// Load config from an explicit file path; a missing file yields defaults.
pub fn load_config_file(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `folio.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Path of the content document (JSON).
content_path = "content.json"

# ---------------------------------------------------------------------------
# Lazy image loading
# ---------------------------------------------------------------------------
[lazy_load]
# Images start loading when they come within this many pixels of the
# viewport. 0 loads only once they are actually visible.
root_margin_px = 200.0

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Minimum horizontal drag, in pixels, that flips to the previous/next image.
swipe_threshold_px = 50.0

# ---------------------------------------------------------------------------
# Routes
# ---------------------------------------------------------------------------
[routes]
# Page shown for unrecognized routes such as "#typo". Only "home" is supported.
unknown = "home"
"##
}

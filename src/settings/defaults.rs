//! Built-in baseline settings.
//!
//! The baseline lives in `config/default_settings.toml` and is compiled into
//! the binary, so a fresh install always has a complete, valid catalog.

use anyhow::Result;
use std::path::Path;

use super::types::CrateSettings;
use super::validation::validate;

/// Default settings embedded in the binary at compile time.
const DEFAULT_SETTINGS: &str = include_str!("../../config/default_settings.toml");

/// Get the built-in baseline settings.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_settings() -> CrateSettings {
    toml::from_str(DEFAULT_SETTINGS).expect("embedded default_settings.toml must be valid")
}

/// Load and validate a full settings document from a TOML file, e.g. a
/// site-specific baseline kept under version control next to the host
/// application.
pub fn load_settings_toml(path: &Path) -> Result<CrateSettings> {
    let content = std::fs::read_to_string(path)?;
    let settings: CrateSettings = toml::from_str(&content)?;
    Ok(validate(settings)?)
}

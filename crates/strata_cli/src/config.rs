//! Flow configuration from `strata.toml`.
//!
//! The file is optional; every field has a default and CLI flags win over
//! file values.

use serde::Deserialize;
use std::path::Path;

/// Errors that can occur when loading or validating a `strata.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Top-level `strata.toml` contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowConfig {
    /// `[flow]` section defaults.
    #[serde(default)]
    pub flow: FlowSection,
}

/// `[flow]` defaults for the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSection {
    /// Number of dies to stack.
    #[serde(default = "default_dies")]
    pub dies: usize,
    /// Area ratio between adjacent dies.
    #[serde(default = "default_area_ratio")]
    pub area_ratio: f64,
    /// Legalizer path: `"abacus"` or `"shift"`.
    #[serde(default = "default_legalizer")]
    pub legalizer: String,
}

fn default_dies() -> usize {
    2
}

fn default_area_ratio() -> f64 {
    1.0
}

fn default_legalizer() -> String {
    "abacus".to_string()
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            dies: default_dies(),
            area_ratio: default_area_ratio(),
            legalizer: default_legalizer(),
        }
    }
}

/// Loads `strata.toml` from a directory, falling back to defaults when the
/// file does not exist.
pub fn load_config(dir: &Path) -> Result<FlowConfig, ConfigError> {
    let path = dir.join("strata.toml");
    if !path.exists() {
        return Ok(FlowConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    load_config_from_str(&content)
}

/// Parses and validates configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<FlowConfig, ConfigError> {
    let config: FlowConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &FlowConfig) -> Result<(), ConfigError> {
    if config.flow.dies == 0 {
        return Err(ConfigError::ValidationError(
            "flow.dies must be at least 1".to_string(),
        ));
    }
    if !(config.flow.area_ratio > 0.0 && config.flow.area_ratio <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "flow.area_ratio must be in (0, 1], got {}",
            config.flow.area_ratio
        )));
    }
    if !matches!(config.flow.legalizer.as_str(), "abacus" | "shift") {
        return Err(ConfigError::ValidationError(format!(
            "flow.legalizer must be `abacus` or `shift`, got `{}`",
            config.flow.legalizer
        )));
    }
    Ok(())
}

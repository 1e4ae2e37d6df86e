//! Configuration types for the rewrite filter.

use serde::{Deserialize, Serialize};

/// Main configuration for the rewrite filter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Replacements to apply, in order. Each replacement operates on the
    /// output of the previous one.
    pub replacements: Vec<ReplacementConfig>,
}

impl FilterConfig {
    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A single declarative replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementConfig {
    /// Regex pattern to search for.
    pub pattern: String,
    /// Replacement template. May reference capture groups (`$1`, `${name}`).
    pub replacement: String,
    /// Match flags. Empty for case-sensitive matching, `"i"` for
    /// case-insensitive matching.
    #[serde(default)]
    pub flags: String,
}

/// Errors that can occur while parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
